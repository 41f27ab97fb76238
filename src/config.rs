//! Tunables for the player widget. Everything here is compile-time; there is
//! no runtime configuration file.

/// Player-wide settings shared by the state holder, spectrum and input router.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub default_volume: f64,
    /// Amount one arrow-key press moves the volume.
    pub volume_step: f64,
    pub fft_size: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub bar_width_multiplier: f64,
    pub bar_gutter: f64,
    pub bar_color_light: &'static str,
    pub bar_color_dark: &'static str,
    /// Minimum horizontal travel in CSS pixels for a swipe.
    pub swipe_threshold: f64,
    /// Maximum travel in CSS pixels that still counts as a tap.
    pub tap_slop: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 0.7,
            volume_step: 0.1,
            fft_size: 256,
            canvas_width: 300,
            canvas_height: 80,
            bar_width_multiplier: 2.5,
            bar_gutter: 1.0,
            bar_color_light: "#3b82f6",
            bar_color_dark: "#60a5fa",
            swipe_threshold: 50.0,
            tap_slop: 10.0,
        }
    }
}

impl PlayerConfig {
    /// Number of frequency bins the analyser yields for the configured transform size.
    pub fn frequency_bin_count(&self) -> usize {
        (self.fft_size / 2) as usize
    }

    pub fn bar_color(&self, dark: bool) -> &'static str {
        if dark {
            self.bar_color_dark
        } else {
            self.bar_color_light
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_yields_128_bins() {
        assert_eq!(PlayerConfig::default().frequency_bin_count(), 128);
    }

    #[test]
    fn bar_color_follows_theme() {
        let config = PlayerConfig::default();
        assert_eq!(config.bar_color(false), "#3b82f6");
        assert_eq!(config.bar_color(true), "#60a5fa");
    }
}
