// Browser adapters: Web Audio analyser, 2D canvas, requestAnimationFrame loop.
use super::{DrawSurface, SpectrumSource};
use crate::error::PlayerError;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    window, AnalyserNode, AudioContext, CanvasRenderingContext2d, HtmlAudioElement,
    HtmlCanvasElement, MediaElementAudioSourceNode,
};

fn graph_err(err: wasm_bindgen::JsValue) -> PlayerError {
    PlayerError::AudioGraph(format!("{err:?}"))
}

/// element -> analyser -> destination. A media element can only be wrapped
/// once, so build this exactly once per mounted element.
pub struct AnalyserGraph {
    context: AudioContext,
    _source: MediaElementAudioSourceNode,
    analyser: AnalyserNode,
}

impl AnalyserGraph {
    pub fn new(audio: &HtmlAudioElement, fft_size: u32) -> Result<Self, PlayerError> {
        let context = AudioContext::new().map_err(graph_err)?;
        let analyser = context.create_analyser().map_err(graph_err)?;
        analyser.set_fft_size(fft_size);

        let source = context
            .create_media_element_source(audio)
            .map_err(graph_err)?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(graph_err)?;
        analyser
            .connect_with_audio_node(&context.destination())
            .map_err(graph_err)?;

        log::debug!(
            "analyser graph ready: fft {} / {} bins",
            analyser.fft_size(),
            analyser.frequency_bin_count()
        );
        Ok(Self {
            context,
            _source: source,
            analyser,
        })
    }

    /// Contexts created before a user gesture start suspended.
    pub fn resume(&self) {
        if let Err(err) = self.context.resume() {
            log::debug!("audio context resume refused: {err:?}");
        }
    }
}

impl SpectrumSource for AnalyserGraph {
    fn bin_count(&self) -> usize {
        self.analyser.frequency_bin_count() as usize
    }

    fn read_bins(&self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(out);
    }
}

impl Drop for AnalyserGraph {
    fn drop(&mut self) {
        let _ = self.context.close();
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_id(id: &str) -> Result<Self, PlayerError> {
        let document = window()
            .and_then(|w| w.document())
            .ok_or(PlayerError::NoWindow)?;
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| PlayerError::MissingElement(id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PlayerError::Canvas(format!("#{id} is not a canvas")))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|err| PlayerError::Canvas(format!("{err:?}")))?
            .ok_or_else(|| PlayerError::Canvas("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| PlayerError::Canvas("unexpected context type".into()))?;
        Ok(Self { canvas, ctx })
    }
}

impl DrawSurface for CanvasSurface {
    fn width(&self) -> f64 {
        f64::from(self.canvas.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.canvas.height())
    }

    fn clear(&self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, width, height);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Self-rescheduling `requestAnimationFrame` task. `stop` (or drop) cancels
/// the pending frame and releases the callback.
pub struct AnimationLoop {
    window: web_sys::Window,
    pending: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationLoop {
    pub fn start<F>(mut frame: F) -> Result<Self, PlayerError>
    where
        F: FnMut() + 'static,
    {
        let window = window().ok_or(PlayerError::NoWindow)?;
        let pending = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let tick = {
            let window = window.clone();
            let pending = pending.clone();
            let callback = callback.clone();
            Closure::wrap(Box::new(move || {
                pending.set(None);
                frame();
                if let Some(next) = callback.borrow().as_ref() {
                    match window.request_animation_frame(next.as_ref().unchecked_ref()) {
                        Ok(id) => pending.set(Some(id)),
                        Err(err) => log::error!("animation frame request failed: {err:?}"),
                    }
                }
            }) as Box<dyn FnMut()>)
        };

        let first = window
            .request_animation_frame(tick.as_ref().unchecked_ref())
            .map_err(|err| PlayerError::Canvas(format!("{err:?}")))?;
        pending.set(Some(first));
        *callback.borrow_mut() = Some(tick);

        Ok(Self {
            window,
            pending,
            callback,
        })
    }

    pub fn stop(&mut self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the callback -> Rc -> callback cycle.
        self.callback.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
