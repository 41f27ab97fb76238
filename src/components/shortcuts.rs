// Global keyboard shortcuts routed through the same actions as the buttons.
use super::PlayerHandle;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use super::audio_binder::ListenerGuard;
#[cfg(target_arch = "wasm32")]
use crate::input::{action_for_key, is_text_entry, suppresses_default, KeyInput};
#[cfg(target_arch = "wasm32")]
use dioxus::core::{Runtime, RuntimeGuard};
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, Event, KeyboardEvent};

#[cfg(target_arch = "wasm32")]
fn is_text_entry_target(event: &Event) -> bool {
    let Some(target) = event.target() else {
        return false;
    };

    let mut current = target.dyn_into::<web_sys::Element>().ok();
    while let Some(element) = current {
        let content_editable = element
            .get_attribute("contenteditable")
            .map(|v| v.to_ascii_lowercase() != "false")
            .unwrap_or(false);
        let input_type = element.get_attribute("type");
        if is_text_entry(&element.tag_name(), input_type.as_deref(), content_editable) {
            return true;
        }
        current = element.parent_element();
    }

    false
}

#[cfg(target_arch = "wasm32")]
fn bind_keyboard(handle: PlayerHandle) -> Option<ListenerGuard> {
    let win = window()?;
    let runtime = Runtime::current();

    let on_key = move |event: Event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let code = key_event.code();
        let key = key_event.key();
        let input = KeyInput {
            code: &code,
            key: &key,
            ctrl_or_meta: key_event.ctrl_key() || key_event.meta_key(),
            alt: key_event.alt_key(),
            composing: key_event.is_composing(),
            in_text_entry: is_text_entry_target(&event),
        };
        let Some(action) = action_for_key(&input) else {
            return;
        };
        if suppresses_default(action) {
            event.prevent_default();
        }

        let _guard = RuntimeGuard::new(runtime.clone());
        handle.dispatch(action);
    };

    match ListenerGuard::attach(&win, "keydown", on_key) {
        Ok(guard) => Some(guard),
        Err(err) => {
            log::error!("keyboard shortcuts disabled: {err}");
            None
        }
    }
}

/// Listen on the window for the player's shortcuts while mounted.
pub fn use_keyboard_shortcuts(handle: PlayerHandle) {
    #[cfg(target_arch = "wasm32")]
    {
        let guard = use_hook(move || Rc::new(RefCell::new(bind_keyboard(handle))));
        use_drop(move || {
            guard.borrow_mut().take();
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    let _ = handle;
}
