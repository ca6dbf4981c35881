//! Configuration file editor command.
//!
//! Opens the specfall configuration file in the user's preferred editor.

use std::process::Command;

use crate::config;

/// Opens the configuration file in the user's preferred editor.
///
/// Tries `$EDITOR`, then nano, then vi. Writes the default file first if
/// none exists yet, so there is always something to edit.
///
/// # Errors
/// - If no editor can be found or executed
/// - If the editor exits with an error
pub fn handle_config() -> anyhow::Result<()> {
    crate::setup::run_setup()?;
    let config_path = config::get_config_path()?;

    tracing::info!("Opening config file: {}", config_path.display());

    let editor = find_editor()?;
    tracing::debug!("Using editor: {}", editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| anyhow::anyhow!("Failed to open editor '{editor}': {e}. Is it installed?"))?;

    if !status.success() {
        return Err(anyhow::anyhow!(
            "Editor exited with error code: {}",
            status.code().unwrap_or(-1)
        ));
    }

    match config::SpecfallConfig::load().and_then(|c| c.validate()) {
        Ok(()) => tracing::info!("Config file edited successfully"),
        Err(e) => {
            tracing::warn!("Edited config does not validate: {e}");
            eprintln!("Warning: {e}");
        }
    }
    Ok(())
}

fn find_editor() -> anyhow::Result<String> {
    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    for editor in &["nano", "vi"] {
        if is_editor_available(editor) {
            return Ok(editor.to_string());
        }
    }

    Err(anyhow::anyhow!(
        "No editor found. Please set the $EDITOR environment variable."
    ))
}

fn is_editor_available(editor: &str) -> bool {
    Command::new("which")
        .arg(editor)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
