//! Bar-spectrum drawing. The frame logic only sees [`SpectrumSource`] and
//! [`DrawSurface`]; the browser analyser, canvas and animation loop live in
//! `web`.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{AnalyserGraph, AnimationLoop, CanvasSurface};

use crate::config::PlayerConfig;

/// Per-frame frequency magnitudes, 0-255 per bin.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub trait SpectrumSource {
    fn bin_count(&self) -> usize;
    fn read_bins(&self, out: &mut [u8]);
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub trait DrawSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&self);
    fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str);
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub struct SpectrumRenderer {
    bins: Vec<u8>,
    config: PlayerConfig,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl SpectrumRenderer {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            bins: vec![0; config.frequency_bin_count()],
            config: config.clone(),
        }
    }

    /// Draw one frame and return how many bars were drawn. One bar per bin,
    /// anchored to the bottom edge at half the bin magnitude; the canvas clips
    /// whatever runs past the right edge.
    pub fn draw_frame(
        &mut self,
        source: &dyn SpectrumSource,
        surface: &dyn DrawSurface,
        dark: bool,
    ) -> usize {
        let count = source.bin_count();
        if self.bins.len() != count {
            self.bins.resize(count, 0);
        }
        source.read_bins(&mut self.bins);

        let width = surface.width();
        let height = surface.height();
        surface.clear();
        if count == 0 {
            return 0;
        }

        let color = self.config.bar_color(dark);
        let bar_width = width / count as f64 * self.config.bar_width_multiplier;
        let mut x = 0.0;
        for &magnitude in &self.bins {
            let bar_height = f64::from(magnitude) / 2.0;
            surface.fill_rect(x, height - bar_height, bar_width, bar_height, color);
            x += bar_width + self.config.bar_gutter;
        }
        self.bins.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FixedBins(Vec<u8>);

    impl SpectrumSource for FixedBins {
        fn bin_count(&self) -> usize {
            self.0.len()
        }

        fn read_bins(&self, out: &mut [u8]) {
            out.copy_from_slice(&self.0);
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        clears: RefCell<usize>,
        rects: RefCell<Vec<(f64, f64, f64, f64, String)>>,
    }

    impl DrawSurface for RecordingSurface {
        fn width(&self) -> f64 {
            300.0
        }

        fn height(&self) -> f64 {
            80.0
        }

        fn clear(&self) {
            *self.clears.borrow_mut() += 1;
        }

        fn fill_rect(&self, x: f64, y: f64, width: f64, height: f64, color: &str) {
            self.rects
                .borrow_mut()
                .push((x, y, width, height, color.to_string()));
        }
    }

    fn renderer() -> SpectrumRenderer {
        SpectrumRenderer::new(&PlayerConfig::default())
    }

    #[test]
    fn silent_frame_draws_zero_height_bars() {
        let source = FixedBins(vec![0; 128]);
        let surface = RecordingSurface::default();

        let drawn = renderer().draw_frame(&source, &surface, false);
        assert_eq!(*surface.clears.borrow(), 1);
        assert_eq!(drawn, 128);
        assert_eq!(surface.rects.borrow().len(), 128);
        assert!(surface
            .rects
            .borrow()
            .iter()
            .all(|(_, y, _, h, _)| *h == 0.0 && *y == 80.0));
    }

    #[test]
    fn bars_scale_with_magnitude_and_step_by_width_plus_gutter() {
        let mut bins = vec![0; 128];
        bins[0] = 200;
        bins[1] = 64;
        let source = FixedBins(bins);
        let surface = RecordingSurface::default();

        renderer().draw_frame(&source, &surface, false);
        let rects = surface.rects.borrow();
        let bar_width = 300.0 / 128.0 * 2.5;

        assert_eq!(rects[0], (0.0, -20.0, bar_width, 100.0, "#3b82f6".to_string()));
        assert_eq!(rects[1].0, bar_width + 1.0);
        assert_eq!(rects[1].1, 48.0);
        assert_eq!(rects[1].3, 32.0);
    }

    #[test]
    fn dark_theme_switches_bar_color() {
        let source = FixedBins(vec![10; 128]);
        let surface = RecordingSurface::default();

        renderer().draw_frame(&source, &surface, true);
        assert!(surface.rects.borrow().iter().all(|r| r.4 == "#60a5fa"));
    }

    #[test]
    fn empty_source_only_clears() {
        let source = FixedBins(Vec::new());
        let surface = RecordingSurface::default();

        assert_eq!(renderer().draw_frame(&source, &surface, false), 0);
        assert_eq!(*surface.clears.borrow(), 1);
        assert!(surface.rects.borrow().is_empty());
    }
}
