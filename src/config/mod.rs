//! Configuration management for specfall.
//!
//! This module handles loading application configuration from TOML files.
//! Configuration is stored in the user's config directory.

pub mod file;

pub use file::{get_config_path, SourceConfig, SpecfallConfig};
