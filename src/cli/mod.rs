//! CLI module for QuietCut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::tracing_log::LOG_LEVELS;

pub mod args;
pub mod commands;

/// QuietCut silence remover
///
/// Cuts silent stretches out of recorded video by stream copy, leaving a
/// little padding around every cut.
#[derive(Parser, Debug)]
#[command(name = "quietcut")]
#[command(about = "QuietCut - Remove silent stretches from recorded video")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: $QUIETCUT_CONFIG, ./quietcut.toml, config/quietcut.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (RUST_LOG takes precedence)
    #[arg(long, global = true, value_parser = clap::builder::PossibleValuesParser::new(LOG_LEVELS.iter().copied()))]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove the silences from one video
    Edit(args::EditArgs),
    /// Detect silences and show the cut plan without writing anything
    Analyze(args::AnalyzeArgs),
    /// Edit every video under a directory
    Batch(args::BatchArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_edit() {
        let cli = Cli::try_parse_from([
            "quietcut",
            "edit",
            "-i",
            "talk.mp4",
            "--silence-thresh",
            "-35",
            "--padding",
            "50",
            "--jobs",
            "4",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Commands::Edit(args) => {
                assert_eq!(args.input, PathBuf::from("talk.mp4"));
                assert_eq!(args.settings.silence_thresh, Some(-35.0));
                assert_eq!(args.settings.padding, Some(50));
                assert_eq!(args.jobs, Some(4));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["quietcut", "edit", "-i", "a.mp4", "--jobs", "0"]).is_err());
        assert!(Cli::try_parse_from(["quietcut", "edit", "-i", "a.mp4", "--log-level", "loud"]).is_err());
        assert!(Cli::try_parse_from([
            "quietcut", "edit", "-i", "a.mp4", "--result", "r.json", "--no-result"
        ])
        .is_err());
    }
}
