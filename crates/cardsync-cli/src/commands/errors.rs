//! Errors command - Tail of the error log

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use cardsync_core::{config::Config, ports::IErrorLog};
use cardsync_store::TextErrorLog;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ErrorsCommand {
    /// Number of lines to show
    #[arg(long, short = 'n', default_value_t = 20)]
    pub limit: usize,
}

impl ErrorsCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);
        let log = TextErrorLog::new(config.paths.error_log.clone());
        let lines = log
            .tail(self.limit)
            .await
            .context("Failed to read error log")?;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "path": log.path().display().to_string(),
                "lines": lines,
            }));
        } else if lines.is_empty() {
            formatter.success("No errors recorded");
        } else {
            for line in &lines {
                formatter.info(line);
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}
