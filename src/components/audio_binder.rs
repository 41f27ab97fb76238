// Audio binder: the per-mount audio element, its native listeners, and the
// effects that keep it in step with the player state.
use super::PlayerHandle;
use crate::catalog::track_at;
use crate::error::PlayerError;
use crate::player::PlaybackDevice;
use dioxus::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use super::PlayerSignal;
#[cfg(target_arch = "wasm32")]
use crate::spectrum::AnalyserGraph;
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::{closure::Closure, JsCast};
#[cfg(target_arch = "wasm32")]
use web_sys::{window, Event, EventTarget, HtmlAudioElement};

pub const AUDIO_ELEMENT_ID: &str = "pocketplayer-audio";

#[cfg(target_arch = "wasm32")]
pub type AudioDevice = WebAudioDevice;
#[cfg(not(target_arch = "wasm32"))]
pub type AudioDevice = NullDevice;

/// `<audio>` element owned by one mounted player. Dropping it pauses
/// playback and removes the element from the document.
#[cfg(target_arch = "wasm32")]
pub struct WebAudioDevice {
    audio: HtmlAudioElement,
    graph: RefCell<Option<Rc<AnalyserGraph>>>,
}

#[cfg(target_arch = "wasm32")]
impl WebAudioDevice {
    pub fn create(id: &str) -> Result<Self, PlayerError> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or(PlayerError::NoWindow)?;
        let audio: HtmlAudioElement = document
            .create_element("audio")
            .map_err(|err| PlayerError::Playback(format!("{err:?}")))?
            .dyn_into()
            .map_err(|_| PlayerError::Playback("created element is not <audio>".into()))?;
        audio.set_id(id);
        audio.set_preload("auto");

        let body = document
            .body()
            .ok_or_else(|| PlayerError::MissingElement("body".into()))?;
        body.append_child(&audio)
            .map_err(|err| PlayerError::Playback(format!("{err:?}")))?;

        Ok(Self {
            audio,
            graph: RefCell::new(None),
        })
    }

    pub fn element(&self) -> &HtmlAudioElement {
        &self.audio
    }

    /// Point the element at `src`. Returns false when it already plays it.
    pub fn set_source(&self, src: &str) -> bool {
        if self.audio.get_attribute("src").as_deref() == Some(src) {
            return false;
        }
        self.audio.set_src(src);
        true
    }

    /// Analyser graph for this element, built on first use.
    pub fn analyser(&self, fft_size: u32) -> Result<Rc<AnalyserGraph>, PlayerError> {
        if let Some(graph) = self.graph.borrow().as_ref() {
            return Ok(graph.clone());
        }
        let graph = Rc::new(AnalyserGraph::new(&self.audio, fft_size)?);
        *self.graph.borrow_mut() = Some(graph.clone());
        Ok(graph)
    }
}

#[cfg(target_arch = "wasm32")]
impl PlaybackDevice for WebAudioDevice {
    fn play(&self) -> Result<(), PlayerError> {
        if let Some(graph) = self.graph.borrow().as_ref() {
            graph.resume();
        }
        let promise = self
            .audio
            .play()
            .map_err(|err| PlayerError::Playback(format!("{err:?}")))?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::debug!("playback start rejected: {err:?}");
            }
        });
        Ok(())
    }

    fn pause(&self) {
        let _ = self.audio.pause();
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }

    fn set_current_time(&self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    fn set_volume(&self, volume: f64) {
        self.audio.set_volume(volume);
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for WebAudioDevice {
    fn drop(&mut self) {
        let _ = self.audio.pause();
        self.graph.borrow_mut().take();
        self.audio.remove();
    }
}

/// Silent stand-in for builds without a DOM.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct NullDevice {
    src: RefCell<String>,
    position: Cell<f64>,
}

#[cfg(not(target_arch = "wasm32"))]
impl NullDevice {
    pub fn create(_id: &str) -> Result<Self, PlayerError> {
        Ok(Self::default())
    }

    pub fn set_source(&self, src: &str) -> bool {
        if *self.src.borrow() == src {
            return false;
        }
        *self.src.borrow_mut() = src.to_string();
        true
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PlaybackDevice for NullDevice {
    fn play(&self) -> Result<(), PlayerError> {
        Ok(())
    }

    fn pause(&self) {}

    fn current_time(&self) -> f64 {
        self.position.get()
    }

    fn duration(&self) -> f64 {
        f64::NAN
    }

    fn set_current_time(&self, seconds: f64) {
        self.position.set(seconds);
    }

    fn set_volume(&self, _volume: f64) {}
}

/// Event listener that unsubscribes itself when dropped.
#[cfg(target_arch = "wasm32")]
pub struct ListenerGuard {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

#[cfg(target_arch = "wasm32")]
impl ListenerGuard {
    pub fn attach<F>(
        target: &impl AsRef<EventTarget>,
        event: &'static str,
        handler: F,
    ) -> Result<Self, PlayerError>
    where
        F: FnMut(Event) + 'static,
    {
        let target = target.as_ref().clone();
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|err| PlayerError::Playback(format!("listen {event}: {err:?}")))?;
        Ok(Self {
            target,
            event,
            callback,
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// timeupdate -> progress + saved position, play -> saved track index,
/// ended -> next track.
#[cfg(target_arch = "wasm32")]
fn bind_media_listeners(state: PlayerSignal, device: Rc<AudioDevice>) -> Vec<ListenerGuard> {
    let runtime = Runtime::current();
    let target = device.element().clone();
    let mut guards = Vec::with_capacity(3);

    let on_time_update = {
        let runtime = runtime.clone();
        let device = device.clone();
        let mut state = state;
        move |_: Event| {
            let _guard = RuntimeGuard::new(runtime.clone());
            state
                .write()
                .on_time_update(device.current_time(), device.duration());
        }
    };
    let on_play = {
        let runtime = runtime.clone();
        move |_: Event| {
            let _guard = RuntimeGuard::new(runtime.clone());
            state.peek().on_play_started();
        }
    };
    let on_ended = {
        let runtime = runtime.clone();
        let mut state = state;
        move |_: Event| {
            let _guard = RuntimeGuard::new(runtime.clone());
            log::debug!("track ended, advancing");
            state.write().on_ended(&mut rand::thread_rng());
        }
    };

    let results = [
        ListenerGuard::attach(&target, "timeupdate", on_time_update),
        ListenerGuard::attach(&target, "play", on_play),
        ListenerGuard::attach(&target, "ended", on_ended),
    ];
    for result in results {
        match result {
            Ok(guard) => guards.push(guard),
            Err(err) => log::error!("media listener not bound: {err}"),
        }
    }
    guards
}

/// Wire the player state to the mounted audio element.
pub fn use_audio_binding(handle: PlayerHandle) {
    let state = handle.state;
    let track_index = use_memo(move || state.read().track_index());
    let volume = use_memo(move || state.read().volume());
    let first_run = use_hook(|| Rc::new(Cell::new(true)));

    // Source, saved position and volume follow the track and volume. The
    // first run also resumes a saved session.
    {
        let device = handle.device.clone();
        let mut state = state;
        use_effect(move || {
            let index = track_index();
            let _ = volume();
            let changed = device.set_source(track_at(index).src);

            let first = first_run.replace(false);
            let started = state.write().bind_source(&*device, changed, first);
            if started && first {
                log::info!("resuming track {index} from saved position");
            }
        });
    }

    #[cfg(target_arch = "wasm32")]
    {
        let device = handle.device.clone();
        let guards = use_hook(move || Rc::new(RefCell::new(bind_media_listeners(state, device))));
        use_drop(move || guards.borrow_mut().clear());
    }
}
