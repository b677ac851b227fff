//! History command - Recent uploads, newest first

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use cardsync_core::{config::Config, ports::IHistoryLog};
use cardsync_store::JsonlHistoryLog;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Number of entries to show
    #[arg(long, short = 'n', default_value_t = 50)]
    pub limit: usize,
}

impl HistoryCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);
        let log = JsonlHistoryLog::new(config.paths.history_file.clone());
        let entries = log
            .recent(self.limit)
            .await
            .context("Failed to read upload history")?;

        if format.is_json() {
            formatter.print_json(&serde_json::to_value(&entries)?);
            return Ok(ExitCode::SUCCESS);
        }

        if entries.is_empty() {
            formatter.info("No uploads recorded yet");
            return Ok(ExitCode::SUCCESS);
        }

        formatter.success(&format!("Last {} upload(s)", entries.len()));
        for entry in &entries {
            formatter.info(&format!(
                "{}  {}  {:<8} {:>5}s  {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                entry.folder,
                entry.status,
                entry.duration_seconds,
                entry.fingerprint.get(..12).unwrap_or(entry.fingerprint.as_str()),
            ));
        }
        Ok(ExitCode::SUCCESS)
    }
}
