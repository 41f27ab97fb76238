use super::{Icon, PlayerHandle};
use crate::db::RepeatMode;
use crate::input::ControlAction;
use dioxus::prelude::*;

const IDLE_BUTTON: &str = "icon-button";
const ACTIVE_BUTTON: &str = "icon-button active";

/// Play/Pause button - completely isolated component
#[component]
pub(super) fn PlayPauseButton() -> Element {
    let handle = use_context::<PlayerHandle>();
    let playing = handle.state.read().is_playing();

    rsx! {
        button {
            id: "play-pause-btn",
            r#type: "button",
            class: "play-button",
            aria_label: if playing { "Pause" } else { "Play" },
            onclick: move |_| handle.dispatch(ControlAction::TogglePlay),
            if playing {
                Icon { name: "pause".to_string(), class: "w-6 h-6".to_string() }
            } else {
                Icon { name: "play".to_string(), class: "w-6 h-6".to_string() }
            }
        }
    }
}

#[component]
pub(super) fn PrevButton() -> Element {
    let handle = use_context::<PlayerHandle>();

    rsx! {
        button {
            id: "prev-btn",
            r#type: "button",
            class: IDLE_BUTTON,
            aria_label: "Previous track",
            onclick: move |_| handle.dispatch(ControlAction::PrevTrack),
            Icon { name: "prev".to_string(), class: "w-5 h-5".to_string() }
        }
    }
}

#[component]
pub(super) fn NextButton() -> Element {
    let handle = use_context::<PlayerHandle>();

    rsx! {
        button {
            id: "next-btn",
            r#type: "button",
            class: IDLE_BUTTON,
            aria_label: "Next track",
            onclick: move |_| handle.dispatch(ControlAction::NextTrack),
            Icon { name: "next".to_string(), class: "w-5 h-5".to_string() }
        }
    }
}

/// Shuffle button - toggle shuffle mode
#[component]
pub(super) fn ShuffleButton() -> Element {
    let handle = use_context::<PlayerHandle>();
    let enabled = handle.state.read().shuffle();

    rsx! {
        button {
            id: "shuffle-btn",
            r#type: "button",
            class: if enabled { ACTIVE_BUTTON } else { IDLE_BUTTON },
            aria_pressed: "{enabled}",
            onclick: move |_| handle.dispatch(ControlAction::ToggleShuffle),
            Icon { name: "shuffle".to_string(), class: "w-5 h-5".to_string() }
        }
    }
}

/// Repeat button - none -> all -> one
#[component]
pub(super) fn RepeatButton() -> Element {
    let handle = use_context::<PlayerHandle>();
    let mode = handle.state.read().repeat_mode();

    rsx! {
        button {
            id: "repeat-btn",
            r#type: "button",
            class: if mode.is_active() { ACTIVE_BUTTON } else { IDLE_BUTTON },
            title: "Repeat: {mode.as_str()}",
            onclick: move |_| handle.dispatch(ControlAction::CycleRepeat),
            Icon {
                name: if mode == RepeatMode::One { "repeat-one".to_string() } else { "repeat".to_string() },
                class: "w-5 h-5".to_string(),
            }
        }
    }
}

#[component]
pub(super) fn VolumeSlider() -> Element {
    let handle = use_context::<PlayerHandle>();
    let volume = handle.state.read().volume();

    let on_volume_change = move |e: Event<FormData>| {
        if let Ok(val) = e.value().parse::<f64>() {
            handle.set_volume(val);
        }
    };

    rsx! {
        div { class: "volume",
            Icon { name: "volume".to_string(), class: "w-5 h-5".to_string() }
            input {
                r#type: "range",
                min: "0",
                max: "1",
                step: "0.01",
                value: "{volume}",
                aria_label: "Volume",
                oninput: on_volume_change,
            }
        }
    }
}

#[component]
pub(super) fn ProgressBar() -> Element {
    let handle = use_context::<PlayerHandle>();
    let width = format!("width: {:.1}%", handle.state.read().progress());

    rsx! {
        div { class: "progress",
            div { class: "progress-fill", style: "{width}" }
        }
    }
}

#[component]
pub(super) fn ThemeSwitch() -> Element {
    let handle = use_context::<PlayerHandle>();
    let dark = handle.state.read().is_dark();

    rsx! {
        div { class: "theme-switch",
            span { "Light" }
            button {
                id: "theme-switch",
                r#type: "button",
                role: "switch",
                aria_checked: "{dark}",
                class: if dark { "switch on" } else { "switch" },
                onclick: move |_| handle.set_dark(!dark),
                span { class: "switch-thumb" }
            }
            span { "Dark" }
        }
    }
}
