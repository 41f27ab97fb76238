use crate::error::PlayerError;

/// The media element as seen by the state holder.
pub trait PlaybackDevice {
    /// Request playback start. Browsers resolve the request asynchronously;
    /// an `Err` here only covers failures raised synchronously.
    fn play(&self) -> Result<(), PlayerError>;
    fn pause(&self);
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn current_time(&self) -> f64;
    /// May be NaN or infinite while metadata is loading.
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn duration(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    fn set_volume(&self, volume: f64);
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Play,
        Pause,
        Seek(f64),
        Volume(f64),
    }

    /// Records every call; `play` fails when `reject_play` is set.
    #[derive(Default)]
    pub struct RecordingDevice {
        pub calls: RefCell<Vec<Call>>,
        pub reject_play: Cell<bool>,
        pub position: Cell<f64>,
        pub length: Cell<f64>,
    }

    impl RecordingDevice {
        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl PlaybackDevice for RecordingDevice {
        fn play(&self) -> Result<(), PlayerError> {
            self.calls.borrow_mut().push(Call::Play);
            if self.reject_play.get() {
                Err(PlayerError::Playback("NotAllowedError".into()))
            } else {
                Ok(())
            }
        }

        fn pause(&self) {
            self.calls.borrow_mut().push(Call::Pause);
        }

        fn current_time(&self) -> f64 {
            self.position.get()
        }

        fn duration(&self) -> f64 {
            self.length.get()
        }

        fn set_current_time(&self, seconds: f64) {
            self.position.set(seconds);
            self.calls.borrow_mut().push(Call::Seek(seconds));
        }

        fn set_volume(&self, volume: f64) {
            self.calls.borrow_mut().push(Call::Volume(volume));
        }
    }
}
