//! Player state holder: the single source of truth for track, volume, theme,
//! repeat, shuffle and the transient playing/progress flags. Every
//! preference change is mirrored into the injected [`PreferenceStore`].

mod device;

pub use device::PlaybackDevice;

#[cfg(test)]
pub(crate) use device::fake;

use crate::config::PlayerConfig;
use crate::db::{
    format_json_bool, normalize_volume, write_pref, PreferenceStore, Preferences, RepeatMode,
    REPEAT_MODE_KEY, SHUFFLE_KEY, THEME_DARK_KEY, TRACK_INDEX_KEY, TRACK_TIME_KEY, VOLUME_KEY,
};
use crate::input::ControlAction;
use rand::Rng;

pub struct PlayerState<S: PreferenceStore> {
    store: S,
    config: PlayerConfig,
    track_count: usize,
    track_index: usize,
    volume: f64,
    theme_dark: bool,
    repeat_mode: RepeatMode,
    shuffle: bool,
    track_time: f64,
    is_playing: bool,
    progress: f64,
}

impl<S: PreferenceStore> PlayerState<S> {
    pub fn load(store: S, config: PlayerConfig, track_count: usize, system_prefers_dark: bool) -> Self {
        let prefs = Preferences::load(&store, &config, track_count, system_prefers_dark);
        log::debug!("loaded preferences: {prefs:?}");

        Self {
            store,
            config,
            track_count: track_count.max(1),
            track_index: prefs.track_index,
            volume: prefs.volume,
            theme_dark: prefs.theme_dark,
            repeat_mode: prefs.repeat_mode,
            shuffle: prefs.shuffle,
            track_time: prefs.track_time,
            is_playing: false,
            progress: 0.0,
        }
    }

    pub fn track_index(&self) -> usize {
        self.track_index
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_dark(&self) -> bool {
        self.theme_dark
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat_mode
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Playback position as a percentage of the track duration.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Shuffle picks uniformly with replacement, so the current track can come
    /// up again.
    pub fn next_track<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let next = if self.shuffle {
            rng.gen_range(0..self.track_count)
        } else {
            (self.track_index + 1) % self.track_count
        };
        self.select_track(next);
    }

    pub fn prev_track(&mut self) {
        let prev = if self.track_index == 0 {
            self.track_count - 1
        } else {
            self.track_index - 1
        };
        self.select_track(prev);
    }

    fn select_track(&mut self, index: usize) {
        self.track_index = index;
        self.track_time = 0.0;
        self.progress = 0.0;
        write_pref(&self.store, TRACK_INDEX_KEY, &index.to_string());
        write_pref(&self.store, TRACK_TIME_KEY, "0");
    }

    pub fn set_volume(&mut self, volume: f64) {
        let Some(volume) = normalize_volume(volume) else {
            return;
        };
        self.volume = volume;
        write_pref(&self.store, VOLUME_KEY, &volume.to_string());
    }

    /// Move the volume by `delta`, clamped to [0, 1]. The sum is only rounded
    /// enough to drop float noise, so 0.7 + 0.1 stores as 0.8.
    pub fn nudge_volume(&mut self, delta: f64) {
        let target = ((self.volume + delta) * 1e9).round() / 1e9;
        self.set_volume(target);
    }

    pub fn set_dark(&mut self, dark: bool) {
        self.theme_dark = dark;
        write_pref(&self.store, THEME_DARK_KEY, &format_json_bool(dark));
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat_mode = self.repeat_mode.cycle();
        write_pref(&self.store, REPEAT_MODE_KEY, self.repeat_mode.as_str());
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        write_pref(&self.store, SHUFFLE_KEY, &format_json_bool(self.shuffle));
    }

    /// Pause when playing, otherwise request a start. The flag flips either
    /// way; a refused start is not reflected back.
    pub fn toggle_play(&mut self, device: &dyn PlaybackDevice) {
        if self.is_playing {
            device.pause();
        } else {
            request_play(device);
        }
        self.is_playing = !self.is_playing;
    }

    /// Start playback on mount when a position was saved. Returns whether a
    /// start was requested.
    pub fn resume(&mut self, device: &dyn PlaybackDevice) -> bool {
        if self.track_time <= 0.0 {
            return false;
        }
        request_play(device);
        self.is_playing = true;
        true
    }

    /// Push the persisted position and current volume onto the element.
    pub fn sync_device(&self, device: &dyn PlaybackDevice) {
        device.set_current_time(self.track_time);
        device.set_volume(self.volume);
    }

    /// Run after the element's source or the volume changed. Always re-syncs
    /// position and volume; the first bind resumes a saved session, later
    /// binds start a new source when the player is already playing. Returns
    /// whether a start was requested.
    pub fn bind_source(
        &mut self,
        device: &dyn PlaybackDevice,
        source_changed: bool,
        first_run: bool,
    ) -> bool {
        self.sync_device(device);
        if first_run {
            return self.resume(device);
        }
        if source_changed && self.is_playing {
            request_play(device);
            return true;
        }
        false
    }

    /// Single dispatch point for buttons, keyboard and gestures.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        action: ControlAction,
        device: &dyn PlaybackDevice,
        rng: &mut R,
    ) {
        match action {
            ControlAction::TogglePlay => self.toggle_play(device),
            ControlAction::NextTrack => self.next_track(rng),
            ControlAction::PrevTrack => self.prev_track(),
            ControlAction::VolumeUp => self.nudge_volume(self.config.volume_step),
            ControlAction::VolumeDown => self.nudge_volume(-self.config.volume_step),
            ControlAction::CycleRepeat => self.cycle_repeat(),
            ControlAction::ToggleShuffle => self.toggle_shuffle(),
        }
    }
}

/// Media element events.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl<S: PreferenceStore> PlayerState<S> {
    /// Last persisted playback position in seconds.
    pub fn track_time(&self) -> f64 {
        self.track_time
    }

    pub fn on_time_update(&mut self, position: f64, duration: f64) {
        if !duration.is_finite() || duration <= 0.0 || !position.is_finite() {
            return;
        }
        self.progress = (position / duration * 100.0).clamp(0.0, 100.0);
        self.track_time = position;
        write_pref(&self.store, TRACK_TIME_KEY, &position.to_string());
    }

    pub fn on_play_started(&self) {
        write_pref(&self.store, TRACK_INDEX_KEY, &self.track_index.to_string());
    }

    /// Track end advances like the next button does; repeat mode is not
    /// consulted here.
    pub fn on_ended<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.next_track(rng);
    }
}

fn request_play(device: &dyn PlaybackDevice) {
    if let Err(err) = device.play() {
        log::debug!("ignoring rejected playback start: {err}");
    }
}
