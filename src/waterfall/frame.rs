//! One spectrum sweep as delivered by the host.

/// Amplitudes across a frequency span for one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// One level per frequency bin, lowest frequency first.
    pub samples: Vec<f64>,
    pub start_frequency: f64,
    pub stop_frequency: f64,
    /// Position of this frame in the source sample stream.
    pub sample_index: i64,
    /// Total samples in the source session, if known (0 otherwise).
    pub total_sample_count: i64,
}

impl Frame {
    pub fn new(
        samples: Vec<f64>,
        start_frequency: f64,
        stop_frequency: f64,
        sample_index: i64,
    ) -> Self {
        Frame {
            samples,
            start_frequency,
            stop_frequency,
            sample_index,
            total_sample_count: 0,
        }
    }

    pub fn with_total_sample_count(mut self, total: i64) -> Self {
        self.total_sample_count = total;
        self
    }

    pub fn bin_count(&self) -> usize {
        self.samples.len()
    }
}

impl AsRef<[f64]> for Frame {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
