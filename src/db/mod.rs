use crate::config::PlayerConfig;
use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

pub const TRACK_INDEX_KEY: &str = "trackIndex";
pub const VOLUME_KEY: &str = "volume";
pub const THEME_DARK_KEY: &str = "themeDark";
pub const REPEAT_MODE_KEY: &str = "repeatMode";
pub const SHUFFLE_KEY: &str = "shuffle";
pub const TRACK_TIME_KEY: &str = "trackTime";

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    #[serde(rename = "none")]
    Off,
    All,
    One,
}

impl RepeatMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RepeatMode::Off => "none",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(raw.trim().to_string())).ok()
    }

    /// none -> all -> one -> none
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }

    pub fn is_active(self) -> bool {
        self != RepeatMode::Off
    }
}

/// String-keyed, string-valued persistence backend.
///
/// Writes are independent of each other; a failure between two writes leaves
/// the stored preferences partially updated.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &'static str, value: &str) -> Result<(), StoreError>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &'static str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Open the best available backend: `localStorage` in the browser, memory
/// elsewhere or when storage is blocked.
pub fn open_store() -> Box<dyn PreferenceStore> {
    #[cfg(target_arch = "wasm32")]
    {
        match BrowserStore::open() {
            Ok(store) => return Box::new(store),
            Err(err) => log::error!("falling back to in-memory preferences: {err}"),
        }
    }
    Box::new(MemoryStore::new())
}

/// In-memory store used by tests and non-browser builds. Clones share the
/// same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        {
            let mut map = store.entries.borrow_mut();
            for (key, value) in entries {
                map.insert(key.to_string(), value.to_string());
            }
        }
        store
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &'static str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser `localStorage` backend. Values are stored raw rather than
/// JSON-encoded so the entries stay readable as plain strings.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy)]
pub struct BrowserStore;

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        match window.local_storage() {
            Ok(Some(_)) => Ok(Self),
            Ok(None) => Err(StoreError::Unavailable("localStorage is disabled".into())),
            Err(err) => Err(StoreError::Unavailable(format!("{err:?}"))),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl PreferenceStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &'static str, value: &str) -> Result<(), StoreError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| StoreError::Write {
                key,
                reason: format!("{err:?}"),
            })
    }
}

/// Best-effort write: failures are logged and dropped.
pub fn write_pref(store: &dyn PreferenceStore, key: &'static str, value: &str) {
    if let Err(err) = store.set(key, value) {
        log::warn!("preference write dropped: {err}");
    }
}

/// Preferences read back at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub track_index: usize,
    pub volume: f64,
    pub theme_dark: bool,
    pub repeat_mode: RepeatMode,
    pub shuffle: bool,
    /// Last persisted playback position, in seconds.
    pub track_time: f64,
}

impl Preferences {
    pub fn defaults(config: &PlayerConfig, system_prefers_dark: bool) -> Self {
        Self {
            track_index: 0,
            volume: config.default_volume,
            theme_dark: system_prefers_dark,
            repeat_mode: RepeatMode::Off,
            shuffle: false,
            track_time: 0.0,
        }
    }

    /// Read every entry independently; anything absent or malformed keeps its
    /// default.
    pub fn load(
        store: &dyn PreferenceStore,
        config: &PlayerConfig,
        track_count: usize,
        system_prefers_dark: bool,
    ) -> Self {
        let defaults = Self::defaults(config, system_prefers_dark);

        Self {
            track_index: read(store, TRACK_INDEX_KEY, |raw| parse_track_index(raw, track_count))
                .unwrap_or(defaults.track_index),
            volume: read(store, VOLUME_KEY, parse_volume).unwrap_or(defaults.volume),
            theme_dark: read(store, THEME_DARK_KEY, parse_json_bool)
                .unwrap_or(defaults.theme_dark),
            repeat_mode: read(store, REPEAT_MODE_KEY, RepeatMode::parse)
                .unwrap_or(defaults.repeat_mode),
            shuffle: read(store, SHUFFLE_KEY, parse_json_bool).unwrap_or(defaults.shuffle),
            track_time: read(store, TRACK_TIME_KEY, parse_track_time)
                .unwrap_or(defaults.track_time),
        }
    }
}

fn read<T>(
    store: &dyn PreferenceStore,
    key: &'static str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let raw = store.get(key)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        log::debug!("ignoring malformed {key} entry {raw:?}");
    }
    parsed
}

fn parse_track_index(raw: &str, track_count: usize) -> Option<usize> {
    if track_count == 0 {
        return None;
    }
    let index = raw.trim().parse::<usize>().ok()?;
    Some(index.min(track_count - 1))
}

pub fn normalize_volume(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

fn parse_volume(raw: &str) -> Option<f64> {
    normalize_volume(raw.trim().parse::<f64>().ok()?)
}

fn parse_json_bool(raw: &str) -> Option<bool> {
    serde_json::from_str::<bool>(raw.trim()).ok()
}

fn parse_track_time(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub fn format_json_bool(value: bool) -> String {
    serde_json::Value::Bool(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(store: &MemoryStore, system_dark: bool) -> Preferences {
        Preferences::load(store, &PlayerConfig::default(), 3, system_dark)
    }

    #[test]
    fn stored_entries_are_read_back_exactly() {
        let store = MemoryStore::with_entries([
            (VOLUME_KEY, "0.3"),
            (THEME_DARK_KEY, "true"),
            (REPEAT_MODE_KEY, "one"),
            (SHUFFLE_KEY, "false"),
            (TRACK_INDEX_KEY, "2"),
        ]);

        let prefs = load(&store, false);
        assert_eq!(prefs.volume, 0.3);
        assert!(prefs.theme_dark);
        assert_eq!(prefs.repeat_mode, RepeatMode::One);
        assert!(!prefs.shuffle);
        assert_eq!(prefs.track_index, 2);
    }

    #[test]
    fn empty_store_uses_defaults_and_system_theme() {
        let store = MemoryStore::new();

        let prefs = load(&store, true);
        assert_eq!(prefs.track_index, 0);
        assert_eq!(prefs.volume, 0.7);
        assert_eq!(prefs.repeat_mode, RepeatMode::Off);
        assert!(!prefs.shuffle);
        assert!(prefs.theme_dark);
        assert_eq!(prefs.track_time, 0.0);

        assert!(!load(&store, false).theme_dark);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn malformed_entries_fall_back_individually() {
        let store = MemoryStore::with_entries([
            (VOLUME_KEY, "loud"),
            (THEME_DARK_KEY, "yes"),
            (REPEAT_MODE_KEY, "forever"),
            (SHUFFLE_KEY, "1"),
            (TRACK_INDEX_KEY, "-1"),
            (TRACK_TIME_KEY, "NaN"),
        ]);

        let prefs = load(&store, false);
        assert_eq!(prefs, Preferences::defaults(&PlayerConfig::default(), false));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let store = MemoryStore::with_entries([
            (VOLUME_KEY, "1.8"),
            (TRACK_INDEX_KEY, "7"),
            (TRACK_TIME_KEY, "-3"),
        ]);

        let prefs = load(&store, false);
        assert_eq!(prefs.volume, 1.0);
        assert_eq!(prefs.track_index, 2);
        assert_eq!(prefs.track_time, 0.0);
    }

    #[test]
    fn zero_volume_is_kept() {
        let store = MemoryStore::with_entries([(VOLUME_KEY, "0")]);
        assert_eq!(load(&store, false).volume, 0.0);
    }

    #[test]
    fn repeat_mode_names_match_storage_format() {
        for mode in [RepeatMode::Off, RepeatMode::All, RepeatMode::One] {
            assert_eq!(RepeatMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(RepeatMode::parse("None"), None);
    }

    #[test]
    fn repeat_mode_cycles_through_three_states() {
        let mut mode = RepeatMode::Off;
        let mut seen = Vec::new();
        for _ in 0..6 {
            mode = mode.cycle();
            seen.push(mode);
        }
        assert_eq!(
            seen,
            vec![
                RepeatMode::All,
                RepeatMode::One,
                RepeatMode::Off,
                RepeatMode::All,
                RepeatMode::One,
                RepeatMode::Off,
            ]
        );
    }

    #[test]
    fn json_booleans_round_trip_as_plain_words() {
        assert_eq!(format_json_bool(true), "true");
        assert_eq!(parse_json_bool(&format_json_bool(false)), Some(false));
    }
}
