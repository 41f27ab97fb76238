use super::audio_binder::{use_audio_binding, AudioDevice, AUDIO_ELEMENT_ID};
use super::player_controls::{
    NextButton, PlayPauseButton, PrevButton, ProgressBar, RepeatButton, ShuffleButton,
    ThemeSwitch, VolumeSlider,
};
use super::shortcuts::use_keyboard_shortcuts;
use super::SpectrumCanvas;
use crate::catalog::{track_at, TRACKS};
use crate::config::PlayerConfig;
use crate::db::{open_store, PreferenceStore};
use crate::input::{ControlAction, GestureTracker};
use crate::player::{PlaybackDevice, PlayerState};
use dioxus::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

pub type PlayerSignal = Signal<PlayerState<Box<dyn PreferenceStore>>>;

/// Shared by every control: the state signal, the mounted audio device, and
/// the theme flag the spectrum loop reads each frame.
#[derive(Clone)]
pub struct PlayerHandle {
    pub state: PlayerSignal,
    pub device: Rc<AudioDevice>,
    pub dark_flag: Rc<Cell<bool>>,
}

impl PlayerHandle {
    pub fn dispatch(&self, action: ControlAction) {
        let mut state = self.state;
        state
            .write()
            .apply(action, &*self.device, &mut rand::thread_rng());
    }

    /// Slider path: updates the state and the element immediately.
    pub fn set_volume(&self, volume: f64) {
        let mut state = self.state;
        state.write().set_volume(volume);
        self.device.set_volume(state.peek().volume());
    }

    pub fn set_dark(&self, dark: bool) {
        let mut state = self.state;
        state.write().set_dark(dark);
    }
}

#[cfg(target_arch = "wasm32")]
fn system_prefers_dark() -> bool {
    web_sys::window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .map(|query| query.matches())
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn system_prefers_dark() -> bool {
    false
}

#[cfg(target_arch = "wasm32")]
fn apply_document_theme(dark: bool) {
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return;
    };
    if let Err(err) = root.class_list().toggle_with_force("dark", dark) {
        log::warn!("could not toggle dark class: {err:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn apply_document_theme(_dark: bool) {}

#[component]
pub fn MusicPlayer() -> Element {
    let device = use_hook(|| {
        AudioDevice::create(AUDIO_ELEMENT_ID)
            .map(Rc::new)
            .map_err(|err| {
                log::error!("audio element unavailable: {err}");
                err.to_string()
            })
    });
    let device = match device {
        Ok(device) => device,
        Err(message) => {
            return rsx! {
                div { class: "player-page",
                    div { class: "player-card player-error", "Audio unavailable: {message}" }
                }
            };
        }
    };

    let state: PlayerSignal = use_signal(|| {
        PlayerState::load(
            open_store(),
            PlayerConfig::default(),
            TRACKS.len(),
            system_prefers_dark(),
        )
    });
    let dark_flag = use_hook(|| Rc::new(Cell::new(false)));
    let handle = use_context_provider(|| PlayerHandle {
        state,
        device: device.clone(),
        dark_flag: dark_flag.clone(),
    });

    use_audio_binding(handle.clone());
    use_keyboard_shortcuts(handle.clone());

    let is_dark = use_memo(move || state.read().is_dark());
    use_effect(move || {
        let dark = is_dark();
        dark_flag.set(dark);
        apply_document_theme(dark);
    });

    let mut gestures = use_signal(|| GestureTracker::new(state.peek().config()));

    let (track, dark) = {
        let player = state.read();
        (track_at(player.track_index()), player.is_dark())
    };

    let on_pointer_up = {
        let handle = handle.clone();
        move |evt: PointerEvent| {
            let point = evt.client_coordinates();
            let gesture = gestures.write().pointer_up(point.x, point.y);
            if let Some(gesture) = gesture {
                log::debug!("gesture {gesture:?}");
                handle.dispatch(gesture.action());
            }
        }
    };

    rsx! {
        div { class: if dark { "player-page dark" } else { "player-page" },
            div { class: "player-card",
                div {
                    class: "player-cover",
                    onpointerdown: move |evt: PointerEvent| {
                        let point = evt.client_coordinates();
                        gestures.write().pointer_down(point.x, point.y);
                    },
                    onpointerup: on_pointer_up,
                    onpointercancel: move |_| gestures.write().cancel(),
                    img {
                        src: "{track.cover}",
                        alt: "{track.title}",
                        draggable: "false",
                    }
                    div { class: "track-info",
                        h2 { class: "track-title", "{track.title}" }
                        p { class: "track-artist", "{track.artist}" }
                    }
                }
                SpectrumCanvas {}
                ProgressBar {}
                div { class: "transport",
                    PrevButton {}
                    PlayPauseButton {}
                    NextButton {}
                }
                div { class: "modes",
                    ShuffleButton {}
                    RepeatButton {}
                    VolumeSlider {}
                }
                ThemeSwitch {}
            }
        }
    }
}
