//! cardsync CLI - Incremental upload of ez Share card data to SleepHQ
//!
//! Provides commands for:
//! - Running a synchronization (optionally from a forced start date)
//! - Computing the remote fingerprint of a date folder
//! - Inspecting the upload history, error log and sync state
//! - Viewing and validating configuration

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod output;
mod wiring;

use cardsync_core::config::Config;
use commands::{
    config::ConfigCommand, errors::ErrorsCommand, fingerprint::FingerprintCommand,
    history::HistoryCommand, run::RunCommand, state::StateCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(
    name = "cardsync",
    version,
    about = "Sync CPAP data from an ez Share Wi-Fi SD card to SleepHQ"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download new data from the card and upload it
    Run(RunCommand),
    /// Compute the remote fingerprint of a date folder
    Fingerprint(FingerprintCommand),
    /// Show recent uploads
    History(HistoryCommand),
    /// Show recent failed runs
    Errors(ErrorsCommand),
    /// Show the persisted sync state
    State(StateCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = load_config(&cli.command, &config_path)?;

    let _log_guard = logging::init(cli.verbose, &config.logging)?;
    tracing::debug!(config_path = %config_path.display(), "Configuration loaded");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    match cli.command {
        Commands::Run(cmd) => cmd.execute(&config, format).await,
        Commands::Fingerprint(cmd) => cmd.execute(&config, format).await,
        Commands::History(cmd) => cmd.execute(&config, format).await,
        Commands::Errors(cmd) => cmd.execute(&config, format).await,
        Commands::State(cmd) => cmd.execute(&config, format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    }
}

/// Loads the configuration a command runs with
///
/// `config` subcommands report parse problems themselves. Every other
/// command refuses to start on a file that exists but does not load.
fn load_config(command: &Commands, path: &Path) -> Result<Config> {
    match command {
        Commands::Config(_) => Ok(Config::load_or_default(path)),
        _ => Config::load_if_present(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
    }
}
