//! State command - Persisted sync state

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use cardsync_core::config::Config;
use cardsync_store::FileStateStore;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StateCommand {}

impl StateCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);
        let store = FileStateStore::new(config.paths.state_file.clone());
        let state = store.read().await.context("Failed to read sync state")?;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "path": store.path().display().to_string(),
                "state": state,
            }));
            return Ok(ExitCode::SUCCESS);
        }

        match (&state.last_folder, &state.last_fingerprint) {
            (None, _) => formatter.info("Nothing synchronized yet; the next run uploads everything"),
            (Some(folder), fingerprint) => {
                formatter.success(&format!("Last synchronized folder: {folder}"));
                formatter.field(
                    "Fingerprint",
                    fingerprint.as_ref().map(|f| f.as_str()).unwrap_or("(none)"),
                );
            }
        }
        formatter.field("File", &store.path().display().to_string());
        Ok(ExitCode::SUCCESS)
    }
}
