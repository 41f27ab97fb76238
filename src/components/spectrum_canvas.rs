use super::PlayerHandle;
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::config::PlayerConfig;
#[cfg(target_arch = "wasm32")]
use crate::error::PlayerError;
#[cfg(target_arch = "wasm32")]
use crate::spectrum::{AnimationLoop, CanvasSurface, SpectrumRenderer};
#[cfg(target_arch = "wasm32")]
use std::{cell::RefCell, rc::Rc};

const CANVAS_ID: &str = "spectrum-canvas";

#[cfg(target_arch = "wasm32")]
fn start_spectrum(handle: &PlayerHandle, config: &PlayerConfig) -> Result<AnimationLoop, PlayerError> {
    let graph = handle.device.analyser(config.fft_size)?;
    let surface = CanvasSurface::from_id(CANVAS_ID)?;
    let mut renderer = SpectrumRenderer::new(config);
    let dark = handle.dark_flag.clone();

    AnimationLoop::start(move || {
        renderer.draw_frame(&*graph, &surface, dark.get());
    })
}

/// Live frequency bars for whatever the player element is playing.
#[component]
pub fn SpectrumCanvas() -> Element {
    let handle = use_context::<PlayerHandle>();
    let config = handle.state.peek().config().clone();

    #[cfg(target_arch = "wasm32")]
    {
        let frames = use_hook(|| Rc::new(RefCell::new(None::<AnimationLoop>)));
        {
            let frames = frames.clone();
            let handle = handle.clone();
            let config = config.clone();
            use_effect(move || {
                if frames.borrow().is_some() {
                    return;
                }
                match start_spectrum(&handle, &config) {
                    Ok(running) => *frames.borrow_mut() = Some(running),
                    Err(err) => log::error!("spectrum disabled: {err}"),
                }
            });
        }
        use_drop(move || {
            if let Some(mut running) = frames.borrow_mut().take() {
                running.stop();
            }
        });
    }

    rsx! {
        canvas {
            id: CANVAS_ID,
            class: "spectrum",
            width: "{config.canvas_width}",
            height: "{config.canvas_height}",
        }
    }
}
