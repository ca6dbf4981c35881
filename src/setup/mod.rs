//! Setup module for initial application configuration.
//!
//! Handles first-run setup by writing the default config file.

use crate::config;
use std::path::Path;

/// Embedded default configuration template.
const DEFAULT_CONFIG: &str = include_str!("../../environments/specfall.toml");

/// Writes the default config file unless one already exists.
///
/// Returns whether a file was written.
///
/// # Errors
/// Returns an error if the config directory or file cannot be written.
pub fn run_setup() -> anyhow::Result<bool> {
    let config_path = config::get_config_path()?;
    write_default_config(&config_path)
}

fn write_default_config(config_path: &Path) -> anyhow::Result<bool> {
    if config_path.exists() {
        tracing::debug!("Config file present: {}", config_path.display());
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, DEFAULT_CONFIG)?;
    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpecfallConfig;

    #[test]
    fn test_default_template_matches_defaults() {
        let config = SpecfallConfig::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, SpecfallConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_existing_config_is_kept() {
        let dir = std::env::temp_dir().join(format!("specfall-setup-{}", std::process::id()));
        let path = dir.join("specfall.toml");
        let _ = std::fs::remove_dir_all(&dir);

        assert!(write_default_config(&path).unwrap());
        std::fs::write(&path, "[playback]\ntick_ms = 10\n").unwrap();
        assert!(!write_default_config(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[playback]\ntick_ms = 10\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
