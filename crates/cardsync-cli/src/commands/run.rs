//! Run command - One synchronization pass
//!
//! Provides the `cardsync run` CLI command which:
//! 1. Validates the configuration and wires the adapters
//! 2. Plans the run against the card (`--dry-run` stops here)
//! 3. Mirrors, packages and uploads the planned folders
//! 4. Reports the outcome; failed runs exit non-zero

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use tracing::info;

use cardsync_core::{
    config::Config,
    domain::{DateFolder, SyncPlan},
    usecases::{PlanPreview, RunOutcome, UploadSummary},
};

use crate::output::{get_formatter, human_bytes, plural, OutputFormat, OutputFormatter};
use crate::wiring::build_executor;

#[derive(Debug, Args)]
pub struct RunCommand {
    /// Re-upload everything from this date folder on (YYYYMMDD)
    #[arg(long, value_name = "YYYYMMDD")]
    pub force_date: Option<DateFolder>,

    /// Show the plan without downloading or uploading anything
    #[arg(long)]
    pub dry_run: bool,
}

impl RunCommand {
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);

        let errors = config.validate();
        if !errors.is_empty() {
            for error in &errors {
                formatter.error(&error.to_string());
            }
            return Ok(ExitCode::FAILURE);
        }

        let executor = build_executor(config)?;
        let force = self.force_date.as_ref();
        if let Some(date) = force {
            info!(date = %date, "Using forced start date");
        }

        if self.dry_run {
            return match executor.plan_only(force).await {
                Ok(preview) => {
                    print_preview(formatter.as_ref(), format, &preview);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    formatter.error(&e.to_string());
                    Ok(ExitCode::FAILURE)
                }
            };
        }

        let outcome = executor.run(force).await;
        print_outcome(formatter.as_ref(), format, &outcome);
        Ok(if outcome.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}

fn print_preview(formatter: &dyn OutputFormatter, format: OutputFormat, preview: &PlanPreview) {
    if format.is_json() {
        formatter.print_json(&serde_json::to_value(preview).unwrap_or_default());
        return;
    }

    formatter.success(&format!(
        "Card has {}",
        plural(preview.remote_folders.len() as u64, "date folder")
    ));
    match &preview.plan {
        SyncPlan::NoOp => formatter.info("Nothing to do, already up to date"),
        SyncPlan::Execute(planned) => {
            formatter.field("Trigger", &planned.trigger.to_string());
            formatter.field("Start", planned.start_folder.as_str());
            formatter.field("Re-fetch last", &planned.forced_redownload_of_last.to_string());
            if planned.is_empty() {
                formatter.info("No folder on or after the start date");
            } else {
                let folders: Vec<&str> = planned.folders_to_fetch.iter().map(|f| f.as_str()).collect();
                formatter.field("Folders", &folders.join(", "));
            }
        }
    }
}

fn print_outcome(formatter: &dyn OutputFormatter, format: OutputFormat, outcome: &RunOutcome) {
    if format.is_json() {
        let json = match outcome {
            RunOutcome::UpToDate => serde_json::json!({"success": true, "status": "up_to_date"}),
            RunOutcome::NoData { plan } => serde_json::json!({
                "success": true,
                "status": "no_data",
                "start_folder": plan.start_folder,
            }),
            RunOutcome::Uploaded(summary) => serde_json::json!({
                "success": true,
                "status": "uploaded",
                "upload": summary,
            }),
            RunOutcome::Failed(err) => serde_json::json!({
                "success": false,
                "status": "failed",
                "kind": err.kind(),
                "error": err.to_string(),
            }),
        };
        formatter.print_json(&json);
        return;
    }

    match outcome {
        RunOutcome::UpToDate => formatter.success("Already up to date"),
        RunOutcome::NoData { plan } => {
            formatter.warn(&format!(
                "No folder on or after {}, nothing uploaded",
                plan.start_folder
            ));
        }
        RunOutcome::Uploaded(summary) => print_summary(formatter, summary),
        RunOutcome::Failed(err) => formatter.error(&err.to_string()),
    }
}

fn print_summary(formatter: &dyn OutputFormatter, summary: &UploadSummary) {
    formatter.success(&format!(
        "Uploaded {} in {}s",
        plural(summary.plan.folders_to_fetch.len() as u64, "date folder"),
        summary.duration_seconds
    ));
    formatter.field("Trigger", &summary.plan.trigger.to_string());
    formatter.field("Range", &format!("{} .. {}", summary.plan.start_folder, summary.latest_folder));
    formatter.field(
        "Files",
        &format!(
            "{} ({}), {} skipped",
            summary.stats.files,
            human_bytes(summary.stats.bytes),
            summary.stats.skipped
        ),
    );
    formatter.field("Archive", &human_bytes(summary.archive_bytes));
    formatter.field("Import", &summary.session_id);
    formatter.field("Fingerprint", summary.fingerprint.short());
}
