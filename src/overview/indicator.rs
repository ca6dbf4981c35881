//! Draggable playback position marker on the overview.

use crate::raster::PixelRect;

/// Analysis settings of the source the frames come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeParams {
    /// FFT blocks folded into one frame.
    pub aggregation_frame: u32,
    pub fft_size: u32,
}

impl AnalyzeParams {
    /// Source samples represented by one frame.
    pub fn samples_per_frame(&self) -> u64 {
        self.aggregation_frame as u64 * self.fft_size as u64
    }
}

impl Default for AnalyzeParams {
    fn default() -> Self {
        AnalyzeParams {
            aggregation_frame: 1,
            fft_size: 2048,
        }
    }
}

/// Width in pixels of the part of the session one frame covers, at least 1
/// and at most the box.
pub fn indicator_width(params: AnalyzeParams, total_count: u64, box_width: usize) -> usize {
    if total_count == 0 {
        return 1;
    }
    let share = params.samples_per_frame() as f64 / total_count as f64;
    ((share * box_width as f64).round() as usize).clamp(1, box_width.max(1))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Indicator {
    position: f64,
    width: usize,
    dragging: bool,
}

impl Indicator {
    pub fn new() -> Self {
        Indicator {
            position: 0.0,
            width: 1,
            dragging: false,
        }
    }

    /// Left edge in overview pixels.
    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width.max(1);
    }

    /// Moves to `percent` of `box_width`. Ignored while the user drags.
    pub fn bind_percent(&mut self, percent: f64, box_width: usize) {
        if self.dragging {
            return;
        }
        self.position = self.clamp(percent / 100.0 * box_width as f64, box_width);
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.position && x < self.position + self.width as f64
    }

    pub fn begin_drag(&mut self) {
        self.dragging = true;
    }

    pub fn drag_to(&mut self, x: f64, box_width: usize) {
        if self.dragging {
            self.position = self.clamp(x, box_width);
        }
    }

    /// Ends a drag, returning the dropped position as a percentage.
    pub fn release(&mut self, box_width: usize) -> Option<f64> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        (box_width > 0).then(|| self.position / box_width as f64 * 100.0)
    }

    pub fn reset(&mut self) {
        self.position = 0.0;
        self.dragging = false;
    }

    pub fn rect(&self, height: usize) -> PixelRect {
        PixelRect::new(self.position.max(0.0).round() as usize, 0, self.width, height)
    }

    fn clamp(&self, x: f64, box_width: usize) -> f64 {
        let max = box_width.saturating_sub(self.width) as f64;
        if x.is_nan() {
            return 0.0;
        }
        x.clamp(0.0, max)
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Indicator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_per_frame() {
        let params = AnalyzeParams {
            aggregation_frame: 4,
            fft_size: 1024,
        };
        assert_eq!(params.samples_per_frame(), 4096);
    }

    #[test]
    fn test_width_from_analysis_params() {
        let params = AnalyzeParams {
            aggregation_frame: 1,
            fft_size: 100,
        };
        assert_eq!(indicator_width(params, 1000, 100), 10);
        assert_eq!(indicator_width(params, 1_000_000, 100), 1);
        assert_eq!(indicator_width(params, 0, 100), 1);
        assert_eq!(indicator_width(params, 10, 100), 100);
    }

    #[test]
    fn test_bound_to_percent_unless_dragging() {
        let mut indicator = Indicator::new();
        indicator.bind_percent(25.0, 200);
        assert_eq!(indicator.position(), 50.0);

        indicator.begin_drag();
        indicator.bind_percent(75.0, 200);
        assert_eq!(indicator.position(), 50.0);
    }

    #[test]
    fn test_drag_is_clamped_to_box() {
        let mut indicator = Indicator::new();
        indicator.set_width(10);
        indicator.begin_drag();
        indicator.drag_to(500.0, 100);
        assert_eq!(indicator.position(), 90.0);
        indicator.drag_to(-5.0, 100);
        assert_eq!(indicator.position(), 0.0);
    }

    #[test]
    fn test_release_reports_percent_once() {
        let mut indicator = Indicator::new();
        indicator.begin_drag();
        indicator.drag_to(40.0, 200);
        assert_eq!(indicator.release(200), Some(20.0));
        assert_eq!(indicator.release(200), None);
    }
}
