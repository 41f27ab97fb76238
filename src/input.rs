//! Keyboard and gesture routing. Both map onto [`ControlAction`], the same
//! actions the on-screen buttons fire.

use crate::config::PlayerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    TogglePlay,
    NextTrack,
    PrevTrack,
    VolumeUp,
    VolumeDown,
    CycleRepeat,
    ToggleShuffle,
}

/// The parts of a keydown event the router looks at.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyInput<'a> {
    /// Physical key, e.g. `"Space"` or `"ArrowUp"`.
    pub code: &'a str,
    /// Produced character, e.g. `"r"` or `"R"`.
    pub key: &'a str,
    pub ctrl_or_meta: bool,
    pub alt: bool,
    pub composing: bool,
    /// The event started where the user types text.
    pub in_text_entry: bool,
}

/// Whether a focused element consumes typed characters. Sliders, checkboxes
/// and buttons do not, so shortcuts keep working after they take focus.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub fn is_text_entry(tag: &str, input_type: Option<&str>, content_editable: bool) -> bool {
    if content_editable {
        return true;
    }
    match tag.to_ascii_lowercase().as_str() {
        "textarea" | "select" => true,
        "input" => {
            let kind = input_type.unwrap_or("text").to_ascii_lowercase();
            !matches!(
                kind.as_str(),
                "range" | "checkbox" | "radio" | "button" | "submit" | "reset" | "image" | "color"
            )
        }
        _ => false,
    }
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub fn action_for_key(input: &KeyInput<'_>) -> Option<ControlAction> {
    // Leave browser shortcuts (Ctrl+R, Cmd+S) and text entry alone.
    if input.composing || input.ctrl_or_meta || input.alt || input.in_text_entry {
        return None;
    }

    let action = match input.code {
        "Space" => ControlAction::TogglePlay,
        "ArrowRight" => ControlAction::NextTrack,
        "ArrowLeft" => ControlAction::PrevTrack,
        "ArrowUp" => ControlAction::VolumeUp,
        "ArrowDown" => ControlAction::VolumeDown,
        _ => {
            if input.key.eq_ignore_ascii_case("r") {
                ControlAction::CycleRepeat
            } else if input.key.eq_ignore_ascii_case("s") {
                ControlAction::ToggleShuffle
            } else {
                return None;
            }
        }
    };
    Some(action)
}

/// Space would otherwise scroll the page.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub fn suppresses_default(action: ControlAction) -> bool {
    action == ControlAction::TogglePlay
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    SwipeLeft,
    SwipeRight,
    Tap,
}

impl Gesture {
    pub fn action(self) -> ControlAction {
        match self {
            Gesture::SwipeLeft => ControlAction::NextTrack,
            Gesture::SwipeRight => ControlAction::PrevTrack,
            Gesture::Tap => ControlAction::TogglePlay,
        }
    }
}

/// Turns pointer down/up pairs into swipes and taps.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    swipe_threshold: f64,
    tap_slop: f64,
    start: Option<(f64, f64)>,
}

impl GestureTracker {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            swipe_threshold: config.swipe_threshold,
            tap_slop: config.tap_slop,
            start: None,
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<Gesture> {
        let (start_x, start_y) = self.start.take()?;
        let dx = x - start_x;
        let dy = y - start_y;

        if dx.abs() >= self.swipe_threshold && dx.abs() > dy.abs() {
            return Some(if dx < 0.0 {
                Gesture::SwipeLeft
            } else {
                Gesture::SwipeRight
            });
        }
        if dx.hypot(dy) <= self.tap_slop {
            return Some(Gesture::Tap);
        }
        None
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &'static str, key: &'static str) -> KeyInput<'static> {
        KeyInput {
            code,
            key,
            ..KeyInput::default()
        }
    }

    #[test]
    fn transport_keys_map_to_actions() {
        assert_eq!(action_for_key(&key("Space", " ")), Some(ControlAction::TogglePlay));
        assert_eq!(
            action_for_key(&key("ArrowRight", "ArrowRight")),
            Some(ControlAction::NextTrack)
        );
        assert_eq!(
            action_for_key(&key("ArrowLeft", "ArrowLeft")),
            Some(ControlAction::PrevTrack)
        );
        assert_eq!(action_for_key(&key("ArrowUp", "ArrowUp")), Some(ControlAction::VolumeUp));
        assert_eq!(
            action_for_key(&key("ArrowDown", "ArrowDown")),
            Some(ControlAction::VolumeDown)
        );
        assert_eq!(action_for_key(&key("KeyQ", "q")), None);
    }

    #[test]
    fn letter_keys_ignore_case() {
        for k in ["r", "R"] {
            assert_eq!(action_for_key(&key("KeyR", k)), Some(ControlAction::CycleRepeat));
        }
        for k in ["s", "S"] {
            assert_eq!(action_for_key(&key("KeyS", k)), Some(ControlAction::ToggleShuffle));
        }
    }

    #[test]
    fn modified_presses_pass_through() {
        let reload = KeyInput {
            ctrl_or_meta: true,
            ..key("KeyR", "r")
        };
        assert_eq!(action_for_key(&reload), None);

        let composing = KeyInput {
            composing: true,
            ..key("KeyS", "s")
        };
        assert_eq!(action_for_key(&composing), None);

        let typing = KeyInput {
            in_text_entry: true,
            ..key("KeyR", "r")
        };
        assert_eq!(action_for_key(&typing), None);
    }

    #[test]
    fn shortcuts_still_fire_from_a_focused_slider() {
        assert!(!is_text_entry("INPUT", Some("range"), false));
        assert!(!is_text_entry("button", None, false));

        let cases = [
            (("Space", " "), ControlAction::TogglePlay),
            (("ArrowUp", "ArrowUp"), ControlAction::VolumeUp),
            (("ArrowDown", "ArrowDown"), ControlAction::VolumeDown),
            (("KeyR", "r"), ControlAction::CycleRepeat),
        ];
        for ((code, pressed), expected) in cases {
            let on_slider = KeyInput {
                in_text_entry: is_text_entry("input", Some("range"), false),
                ..key(code, pressed)
            };
            assert_eq!(action_for_key(&on_slider), Some(expected));
        }
    }

    #[test]
    fn text_fields_swallow_shortcuts() {
        assert!(is_text_entry("input", None, false));
        assert!(is_text_entry("input", Some("search"), false));
        assert!(is_text_entry("textarea", None, false));
        assert!(is_text_entry("div", None, true));
        assert!(!is_text_entry("div", None, false));
    }

    #[test]
    fn only_space_suppresses_default() {
        assert!(suppresses_default(ControlAction::TogglePlay));
        assert!(!suppresses_default(ControlAction::VolumeUp));
    }

    #[test]
    fn horizontal_swipes_change_track() {
        let mut tracker = GestureTracker::new(&PlayerConfig::default());

        tracker.pointer_down(200.0, 100.0);
        assert_eq!(tracker.pointer_up(120.0, 110.0), Some(Gesture::SwipeLeft));
        assert_eq!(Gesture::SwipeLeft.action(), ControlAction::NextTrack);

        tracker.pointer_down(100.0, 100.0);
        assert_eq!(tracker.pointer_up(190.0, 95.0), Some(Gesture::SwipeRight));
        assert_eq!(Gesture::SwipeRight.action(), ControlAction::PrevTrack);
    }

    #[test]
    fn small_movement_is_a_tap() {
        let mut tracker = GestureTracker::new(&PlayerConfig::default());
        tracker.pointer_down(50.0, 50.0);
        assert_eq!(tracker.pointer_up(53.0, 52.0), Some(Gesture::Tap));
        assert_eq!(Gesture::Tap.action(), ControlAction::TogglePlay);
    }

    #[test]
    fn vertical_drags_and_orphan_ups_are_ignored() {
        let mut tracker = GestureTracker::new(&PlayerConfig::default());

        tracker.pointer_down(50.0, 50.0);
        assert_eq!(tracker.pointer_up(60.0, 160.0), None);

        assert_eq!(tracker.pointer_up(0.0, 0.0), None);

        tracker.pointer_down(50.0, 50.0);
        tracker.cancel();
        assert_eq!(tracker.pointer_up(50.0, 50.0), None);
    }
}
