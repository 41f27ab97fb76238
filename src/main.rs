use dioxus::prelude::*;

mod catalog;
mod components;
mod config;
mod db;
mod error;
mod input;
mod player;
mod spectrum;

use components::MusicPlayer;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    // Only fails if a logger is already installed.
    let _ = console_log::init_with_level(level);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {}

fn main() {
    init_logging();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Title { "Pocket Player" }
        document::Meta { name: "color-scheme", content: "light dark" }
        document::Meta { name: "theme-color", content: "#3b82f6" }

        document::Stylesheet { href: APP_CSS }

        MusicPlayer {}
    }
}
