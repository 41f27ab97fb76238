use thiserror::Error;

/// Failures talking to the preference backend.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),

    #[error("failed to write key {key}: {reason}")]
    Write { key: &'static str, reason: String },
}

/// Failures from the browser media and graphics adapters.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayerError {
    #[error("no browser window")]
    NoWindow,

    #[error("element #{0} not found")]
    MissingElement(String),

    #[error("audio graph setup failed: {0}")]
    AudioGraph(String),

    #[error("canvas setup failed: {0}")]
    Canvas(String),

    #[error("playback request failed: {0}")]
    Playback(String),
}
