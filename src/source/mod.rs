//! Synthetic spectrum session.
//!
//! Generates complex baseband blocks with a few drifting and keyed carriers
//! over a noise floor, runs them through an FFT and turns the power into
//! level frames across `center ± sample_rate / 2`. The whole session is
//! produced up front so the overview can show all of it.

use rustfft::{num_complex::Complex, FftPlanner};
use specfall::{AnalyzeParams, Frame};
use std::f64::consts::PI;

use crate::config::SourceConfig;

/// Added to the normalized power in dB so that levels land in the dBuV-like
/// range the default palettes expect.
const LEVEL_OFFSET_DB: f64 = -40.0;
/// Floor for bins with no energy at all.
const MIN_LEVEL_DB: f64 = -160.0;
const NOISE_AMPLITUDE: f64 = 0.02;

/// One carrier: offset from center as a fraction of the sample rate.
struct Carrier {
    offset: f64,
    drift: f64,
    drift_period: f64,
    amplitude: f64,
    /// Keyed on for `duty` of every `key_period` frames, when set.
    keying: Option<(usize, f64)>,
}

const CARRIERS: &[Carrier] = &[
    Carrier {
        offset: -0.31,
        drift: 0.0,
        drift_period: 1.0,
        amplitude: 0.5,
        keying: None,
    },
    Carrier {
        offset: -0.08,
        drift: 0.04,
        drift_period: 600.0,
        amplitude: 0.2,
        keying: None,
    },
    Carrier {
        offset: 0.12,
        drift: 0.0,
        drift_period: 1.0,
        amplitude: 0.1,
        keying: Some((90, 0.4)),
    },
    Carrier {
        offset: 0.27,
        drift: 0.1,
        drift_period: 1500.0,
        amplitude: 0.05,
        keying: None,
    },
];

impl Carrier {
    fn frequency_at(&self, frame: usize) -> f64 {
        self.offset + self.drift * (2.0 * PI * frame as f64 / self.drift_period).sin()
    }

    fn is_on(&self, frame: usize) -> bool {
        match self.keying {
            Some((period, duty)) => ((frame % period) as f64) < period as f64 * duty,
            None => true,
        }
    }
}

/// Deterministic xorshift noise in `-1.0..1.0`.
struct Noise(u64);

impl Noise {
    fn new(seed: u64) -> Self {
        Noise(seed.max(1))
    }

    fn next(&mut self) -> f64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        (self.0 >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }
}

/// A generated session, oldest frame first.
pub struct Session {
    pub frames: Vec<Frame>,
    pub analyze: AnalyzeParams,
    pub sample_rate: f64,
    pub total_sample_count: i64,
}

impl Session {
    /// Source samples consumed by one frame.
    pub fn samples_per_frame(&self) -> u64 {
        self.analyze.samples_per_frame()
    }
}

/// Builds the whole session described by `config`.
pub fn generate_session(config: &SourceConfig) -> Session {
    let fft_size = config.fft_size as usize;
    let analyze = AnalyzeParams {
        aggregation_frame: config.aggregation_frame,
        fft_size: config.fft_size,
    };
    let samples_per_frame = analyze.samples_per_frame() as i64;
    let total_sample_count = samples_per_frame * config.frames as i64;

    let start_frequency = config.center_frequency - config.sample_rate / 2.0;
    let stop_frequency = config.center_frequency + config.sample_rate / 2.0;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let window: Vec<f64> = (0..fft_size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / fft_size as f64).cos()))
        .collect();
    // Window gain, so a full-scale carrier reads 0 dB before the offset
    let norm = window.iter().sum::<f64>().powi(2);

    let mut noise = Noise::new(config.seed);
    let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];
    let mut power = vec![0.0; fft_size];
    let mut frames = Vec::with_capacity(config.frames);

    for frame_index in 0..config.frames {
        power.iter_mut().for_each(|p| *p = 0.0);

        for block in 0..config.aggregation_frame as usize {
            let t0 = (frame_index * config.aggregation_frame as usize + block) * fft_size;
            for (i, sample) in buffer.iter_mut().enumerate() {
                let t = (t0 + i) as f64;
                let mut value = Complex::new(
                    noise.next() * NOISE_AMPLITUDE,
                    noise.next() * NOISE_AMPLITUDE,
                );
                for carrier in CARRIERS.iter().filter(|c| c.is_on(frame_index)) {
                    let phase = 2.0 * PI * carrier.frequency_at(frame_index) * t;
                    value += Complex::from_polar(carrier.amplitude, phase);
                }
                *sample = value * window[i];
            }

            fft.process(&mut buffer);
            for (p, bin) in power.iter_mut().zip(&buffer) {
                *p += bin.norm_sqr();
            }
        }

        let blocks = config.aggregation_frame.max(1) as f64;
        // Negative frequencies live in the upper half of the FFT output
        power.rotate_left(fft_size / 2);
        let levels: Vec<f64> = power
            .iter()
            .map(|p| to_level(p / blocks / norm))
            .collect();

        let samples = reduce_bins(&levels, config.bins);
        frames.push(
            Frame::new(
                samples,
                start_frequency,
                stop_frequency,
                frame_index as i64 * samples_per_frame,
            )
            .with_total_sample_count(total_sample_count),
        );
    }

    tracing::info!(
        "Generated {} frames of {} bins ({:.3}..{:.3} MHz)",
        frames.len(),
        config.bins,
        start_frequency / 1e6,
        stop_frequency / 1e6
    );

    Session {
        frames,
        analyze,
        sample_rate: config.sample_rate,
        total_sample_count,
    }
}

fn to_level(power: f64) -> f64 {
    if power > 0.0 {
        (10.0 * power.log10() + LEVEL_OFFSET_DB).max(MIN_LEVEL_DB)
    } else {
        MIN_LEVEL_DB
    }
}

/// Averages groups of FFT bins down to `bins` values.
fn reduce_bins(levels: &[f64], bins: usize) -> Vec<f64> {
    if bins == 0 || levels.is_empty() {
        return Vec::new();
    }
    let group = levels.len() as f64 / bins as f64;
    (0..bins)
        .map(|b| {
            let start = (b as f64 * group) as usize;
            let end = (((b + 1) as f64 * group) as usize).clamp(start + 1, levels.len());
            levels[start..end].iter().sum::<f64>() / (end - start) as f64
        })
        .collect()
}
