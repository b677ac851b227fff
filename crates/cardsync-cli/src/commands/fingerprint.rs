//! Fingerprint command - Remote fingerprint of one date folder
//!
//! Switches to the card, lists the folder, probes every whitelisted file
//! and prints the fingerprint the planner would compare against the state.
//! `--output` writes the bare hash to a file; `--save` records it, with
//! the folder, as the current sync state.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cardsync_core::{
    config::Config,
    domain::{DateFolder, Fingerprint},
    ports::IStateStore,
    usecases::FolderFingerprint,
};
use cardsync_store::FileStateStore;

use crate::output::{get_formatter, human_bytes, OutputFormat};
use crate::wiring::build_executor;

#[derive(Debug, Args)]
pub struct FingerprintCommand {
    /// Date folder to fingerprint (YYYYMMDD)
    #[arg(value_name = "YYYYMMDD")]
    pub date: DateFolder,

    /// Write the hash to this file
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Record the folder and hash as the sync state
    #[arg(long)]
    pub save: bool,
}

impl FingerprintCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);
        let executor = build_executor(config)?;

        let result = match executor.fingerprint_folder(&self.date).await {
            Ok(result) => result,
            Err(e) => {
                formatter.error(&e.to_string());
                return Ok(ExitCode::FAILURE);
            }
        };

        if let Some(path) = &self.output {
            write_hash(path, &result.fingerprint).await?;
            info!(path = %path.display(), "Fingerprint written");
        }
        if self.save {
            FileStateStore::new(config.paths.state_file.clone())
                .save(&result.folder, &result.fingerprint)
                .await?;
        }

        if format.is_json() {
            formatter.print_json(&serde_json::to_value(&result)?);
        } else {
            print_human(formatter.as_ref(), &result);
            if let Some(path) = &self.output {
                formatter.info(&format!("Saved to {}", path.display()));
            }
            if self.save {
                formatter.info("Recorded as sync state");
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn print_human(formatter: &dyn crate::output::OutputFormatter, result: &FolderFingerprint) {
    formatter.success(&format!("{} {}", result.folder, result.fingerprint));
    for entry in &result.entries {
        let marker = if entry.is_whitelisted { " " } else { "-" };
        formatter.info(&format!(
            "{marker} {:<32} {:>10}",
            entry.name,
            human_bytes(entry.size)
        ));
    }
}

/// Writes `hash` followed by a newline
pub async fn write_hash(path: &Path, hash: &Fingerprint) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, format!("{hash}\n"))
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
