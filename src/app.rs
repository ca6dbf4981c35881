//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use crate::commands;
use crate::config;
use crate::logging;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use specfall::ColormapName;
use std::io;
use std::process;

/// Writes the default configuration when none exists yet.
fn check_and_run_setup() -> anyhow::Result<()> {
    let config_path = config::get_config_path()?;
    if config_path.exists() {
        tracing::debug!("Using configuration at {}", config_path.display());
        return Ok(());
    }

    tracing::info!("No configuration found, writing defaults");
    if crate::setup::run_setup()? {
        tracing::info!("Default configuration written to {}", config_path.display());
    }
    Ok(())
}

fn parse_colormap(value: &str) -> Result<ColormapName, String> {
    value.parse()
}

/// A terminal spectrum waterfall with a whole-session overview
#[derive(Parser)]
#[command(name = "specfall")]
#[command(version)]
#[command(about = "A terminal spectrum waterfall with a whole-session overview")]
#[command(long_about = "A terminal spectrum waterfall with a whole-session overview.\n\nDrag on the waterfall to measure a frequency range (and its duration when\nthe drag spans rows). Drag the overview indicator to seek, or drag anywhere\nelse on the overview to select a range of the session.\n\nDEFAULT COMMAND:\n    If no command is specified, 'view' is used by default.\n    View options (--frames, --colormap) can be used without explicitly saying 'view'.\n\nEXAMPLES:\n    # Start the viewer with the configured session\n    $ specfall\n\n    # Shorter session with a different gradient\n    $ specfall --frames 500 --colormap viridis\n\n    # Edit configuration file\n    $ specfall config")]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/specfall/specfall.toml\n    Logs:               ~/.local/state/specfall/specfall.log.*"
)]
struct Cli {
    /// Number of frames in the generated session (view default command)
    #[arg(long, value_name = "N", global = true)]
    frames: Option<usize>,

    /// Gradient for both views: jet, hot, cool, greys, viridis (view default command)
    #[arg(long, value_name = "NAME", value_parser = parse_colormap, global = true)]
    colormap: Option<ColormapName>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the live waterfall and session overview (default)
    ///
    /// Space pauses, c clears the waterfall, x drops selections, q/Esc quits.
    #[command(visible_alias = "v")]
    View,

    /// Open configuration file in your preferred editor
    ///
    /// Edit colormaps, level ranges, playback speed and the synthetic source.
    /// Uses $EDITOR environment variable or falls back to nano/vi.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Examples:
    ///   specfall completions bash > specfall.bash
    ///   specfall completions zsh > _specfall
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If setup fails
/// - If logging initialization fails
/// - If command execution fails
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that need neither logging nor config
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "specfall", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    logging::init_logging()?;
    check_and_run_setup()?;

    match cli.command {
        None | Some(Commands::View) => {
            commands::handle_view(cli.frames, cli.colormap).await?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_takes_view_options() {
        let cli =
            Cli::try_parse_from(["specfall", "--frames", "300", "--colormap", "Hot"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.frames, Some(300));
        assert_eq!(cli.colormap, Some(ColormapName::Hot));
    }

    #[test]
    fn test_unknown_colormap_is_rejected() {
        assert!(Cli::try_parse_from(["specfall", "--colormap", "rainbow"]).is_err());
    }

    #[test]
    fn test_subcommands_parse() {
        let cli = Cli::try_parse_from(["specfall", "view", "--frames", "10"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::View)));
        assert_eq!(cli.frames, Some(10));
        let cli = Cli::try_parse_from(["specfall", "completions", "bash"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Completions { shell: Shell::Bash })));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
