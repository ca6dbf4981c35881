//! Configuration file management for specfall.
//!
//! This module handles loading application configuration from TOML files.
//! Configuration is stored in the user's config directory. Every section and
//! field has a default, so partial files are accepted.

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};
use specfall::{ColormapName, OverviewOptions, WaterfallOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Live waterfall display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallConfig {
    /// Gradient name: jet, hot, cool, greys or viridis
    pub colormap: ColormapName,
    /// Number of palette shades (at least 2)
    pub shade_count: usize,
    /// Level mapped to the lowest shade
    pub min_level: f64,
    /// Level mapped to the highest shade
    pub max_level: f64,
    /// Width of the legend band in terminal columns
    pub legend_width: usize,
    /// Pixel rows kept free at the bottom of the waterfall
    pub padding: usize,
    /// Rows of history kept in the raster
    pub rows: usize,
    /// Allow drag-to-select on the waterfall
    pub selection: bool,
    /// How many rows remember their source sample index
    pub history_capacity: usize,
    /// Minimum milliseconds between handled pointer moves
    pub pointer_interval_ms: u64,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            colormap: ColormapName::Jet,
            shade_count: 150,
            min_level: -125.0,
            max_level: 0.0,
            legend_width: 8,
            padding: 0,
            rows: 120,
            selection: true,
            history_capacity: 800,
            pointer_interval_ms: 4,
        }
    }
}

/// Session overview settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    pub colormap: ColormapName,
    pub shade_count: usize,
    pub min_level: f64,
    pub max_level: f64,
    /// Height of the overview in terminal rows
    pub height: u16,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            colormap: ColormapName::Jet,
            shade_count: 140,
            min_level: -140.0,
            max_level: 0.0,
            height: 6,
        }
    }
}

/// Playback pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Milliseconds between ticks
    pub tick_ms: u64,
    /// Frames pushed to the waterfall on every tick
    pub frames_per_tick: usize,
    /// Start over when the session ends
    pub loop_session: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_ms: 50,
            frames_per_tick: 1,
            loop_session: true,
        }
    }
}

/// Synthetic spectrum source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Tuned center frequency in Hz
    pub center_frequency: f64,
    /// Complex sample rate in Hz; also the displayed span
    pub sample_rate: f64,
    /// FFT length per block
    pub fft_size: u32,
    /// FFT blocks averaged into one frame
    pub aggregation_frame: u32,
    /// Bins per frame after reduction
    pub bins: usize,
    /// Frames in the generated session
    pub frames: usize,
    /// Seed for the noise generator
    pub seed: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            center_frequency: 98_000_000.0,
            sample_rate: 2_048_000.0,
            fft_size: 1024,
            aggregation_frame: 1,
            bins: 512,
            frames: 2000,
            seed: 7,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecfallConfig {
    pub waterfall: WaterfallConfig,
    pub overview: OverviewConfig,
    pub playback: PlaybackConfig,
    pub source: SourceConfig,
}

impl SpecfallConfig {
    /// Loads configuration from the user's config directory.
    ///
    /// # Errors
    /// - If the config directory cannot be determined
    /// - If the config file cannot be read
    /// - If the TOML is malformed
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read {}: {e}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow!("Invalid configuration: {e}"))
    }

    /// Rejects values the views cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        let w = &self.waterfall;
        validate_levels("waterfall", w.shade_count, w.min_level, w.max_level)?;
        let o = &self.overview;
        validate_levels("overview", o.shade_count, o.min_level, o.max_level)?;

        if self.waterfall.rows == 0 {
            bail!("waterfall.rows must be greater than 0");
        }
        if self.playback.tick_ms == 0 {
            bail!("playback.tick_ms must be greater than 0");
        }
        if self.playback.frames_per_tick == 0 {
            bail!("playback.frames_per_tick must be greater than 0");
        }
        if !(self.source.sample_rate > 0.0) || !self.source.center_frequency.is_finite() {
            bail!("source.sample_rate must be positive and source.center_frequency finite");
        }
        if self.source.frames == 0 {
            bail!("source.frames must be greater than 0");
        }
        if self.source.fft_size == 0 || self.source.aggregation_frame == 0 {
            bail!("source.fft_size and source.aggregation_frame must be greater than 0");
        }
        if self.source.bins == 0 || self.source.bins > self.source.fft_size as usize {
            bail!(
                "source.bins must be between 1 and source.fft_size ({})",
                self.source.fft_size
            );
        }
        Ok(())
    }

    pub fn waterfall_options(&self) -> WaterfallOptions {
        let w = &self.waterfall;
        WaterfallOptions {
            colormap: w.colormap,
            shade_count: w.shade_count,
            min_level: w.min_level,
            max_level: w.max_level,
            legend_width: w.legend_width,
            padding: w.padding,
            rows: w.rows,
            selection: w.selection,
            history_capacity: w.history_capacity,
            sample_rate: self.source.sample_rate,
            pointer_interval: Duration::from_millis(w.pointer_interval_ms),
        }
    }

    pub fn overview_options(&self) -> OverviewOptions {
        let o = &self.overview;
        OverviewOptions {
            colormap: o.colormap,
            shade_count: o.shade_count,
            min_level: o.min_level,
            max_level: o.max_level,
            pointer_interval: Duration::from_millis(self.waterfall.pointer_interval_ms),
        }
    }
}

fn validate_levels(
    section: &str,
    shade_count: usize,
    min_level: f64,
    max_level: f64,
) -> anyhow::Result<()> {
    if shade_count < 2 {
        bail!("{section}.shade_count must be at least 2, got {shade_count}");
    }
    if !min_level.is_finite() || !max_level.is_finite() {
        bail!("{section}.min_level and {section}.max_level must be finite numbers");
    }
    if min_level >= max_level {
        bail!("{section}.min_level ({min_level}) must be below {section}.max_level ({max_level})");
    }
    Ok(())
}

/// Retrieves the path to the config file, creating its directory.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("specfall");

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow!("Failed to create config directory: {e}"))?;

    Ok(config_dir.join("specfall.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = SpecfallConfig::from_toml_str("").unwrap();
        assert_eq!(config, SpecfallConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = SpecfallConfig::from_toml_str(
            r#"
            [waterfall]
            colormap = "viridis"
            rows = 64
            "#,
        )
        .unwrap();
        assert_eq!(config.waterfall.colormap, ColormapName::Viridis);
        assert_eq!(config.waterfall.rows, 64);
        assert_eq!(config.waterfall.shade_count, 150);
        assert_eq!(config.overview, OverviewConfig::default());
    }

    #[test]
    fn test_round_trip() {
        let mut config = SpecfallConfig::default();
        config.overview.colormap = ColormapName::Hot;
        config.playback.tick_ms = 20;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(SpecfallConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_colormap_is_rejected() {
        let err =
            SpecfallConfig::from_toml_str("[waterfall]\ncolormap = \"rainbow\"\n").unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_validation() {
        assert!(SpecfallConfig::default().validate().is_ok());

        let mut config = SpecfallConfig::default();
        config.waterfall.shade_count = 1;
        assert!(config.validate().unwrap_err().to_string().contains("shade_count"));

        let mut config = SpecfallConfig::default();
        config.overview.min_level = 0.0;
        assert!(config.validate().unwrap_err().to_string().contains("overview.min_level"));

        let mut config = SpecfallConfig::default();
        config.waterfall.max_level = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SpecfallConfig::default();
        config.waterfall.rows = 0;
        assert!(config.validate().is_err());

        let mut config = SpecfallConfig::default();
        config.playback.tick_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SpecfallConfig::default();
        config.source.bins = 4096;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_options_follow_config() {
        let config = SpecfallConfig::default();
        let waterfall = config.waterfall_options();
        assert_eq!(waterfall.rows, 120);
        assert_eq!(waterfall.sample_rate, 2_048_000.0);
        assert_eq!(waterfall.pointer_interval, Duration::from_millis(4));
        assert_eq!(config.overview_options().shade_count, 140);
    }
}
