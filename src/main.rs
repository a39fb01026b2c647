//! QuietCut CLI
//!
//! Cuts the silent stretches out of a recorded video without re-encoding.
//!
//! # Usage
//!
//! ```bash
//! quietcut edit --input talk.mp4
//! quietcut edit --input talk.mp4 --output talk_tight.mp4 --silence-thresh -35 --padding 150
//! quietcut analyze --input talk.mp4 --json
//! quietcut batch --dir recordings/ --output-dir edited/
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use quietcut::adapters::toml_config::AppConfig;
use quietcut::adapters::tracing_log::init_logging;
use quietcut::cli::{commands, Cli, Commands};
use quietcut::config_initialization::resolve_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::discover(cli.config.as_deref());
    let (level, json) = match &config {
        Ok(config) => resolve_logging(&cli, config),
        Err(_) => (cli.log_level.clone().unwrap_or_else(|| "info".to_string()), cli.log_json),
    };
    init_logging(&level, json);
    let config = config?;
    debug!("Configuration: {:?}", config);

    info!("Starting QuietCut {}", env!("CARGO_PKG_VERSION"));
    match cli.command {
        Commands::Edit(args) => commands::edit(&config, args).await,
        Commands::Analyze(args) => commands::analyze(&config, args).await,
        Commands::Batch(args) => commands::batch(&config, args).await,
    }
}
