//! UI layer: the player shell, its controls, and the browser bindings that
//! feed the state holder.

mod audio_binder;
mod icons;
mod music_player;
mod player_controls;
mod shortcuts;
mod spectrum_canvas;

pub use icons::*;
pub use music_player::*;
pub use spectrum_canvas::*;
