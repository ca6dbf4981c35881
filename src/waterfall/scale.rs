//! Pixel to frequency mapping for the plot region.

/// Linear mapping from plot x coordinates to frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleContext {
    pub start_frequency: f64,
    pub stop_frequency: f64,
    pub frequency_per_pixel: f64,
}

impl ScaleContext {
    /// Builds the mapping for a plot `plot_width` pixels wide.
    ///
    /// Returns `None` for a zero width; there is nothing to map onto yet.
    pub fn new(start_frequency: f64, stop_frequency: f64, plot_width: usize) -> Option<Self> {
        if plot_width == 0 {
            return None;
        }
        Some(ScaleContext {
            start_frequency,
            stop_frequency,
            frequency_per_pixel: (stop_frequency - start_frequency) / plot_width as f64,
        })
    }

    /// Same frequency span, spread over a new plot width.
    pub fn rescaled(&self, plot_width: usize) -> Option<Self> {
        ScaleContext::new(self.start_frequency, self.stop_frequency, plot_width)
    }

    pub fn frequency_at(&self, x: f64) -> f64 {
        self.start_frequency + x * self.frequency_per_pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fm_band_over_500_pixels() {
        let scale = ScaleContext::new(88_000_000.0, 108_000_000.0, 500).unwrap();
        assert_eq!(scale.frequency_per_pixel, 40_000.0);
        assert_eq!(scale.frequency_at(100.0), 92_000_000.0);
        assert_eq!(scale.frequency_at(200.0), 96_000_000.0);
    }

    #[test]
    fn test_zero_width_has_no_scale() {
        assert!(ScaleContext::new(0.0, 1.0, 0).is_none());
    }

    #[test]
    fn test_rescale_keeps_span() {
        let scale = ScaleContext::new(0.0, 1000.0, 100).unwrap();
        let wider = scale.rescaled(200).unwrap();
        assert_eq!(wider.start_frequency, 0.0);
        assert_eq!(wider.stop_frequency, 1000.0);
        assert_eq!(wider.frequency_per_pixel, 5.0);
    }
}
