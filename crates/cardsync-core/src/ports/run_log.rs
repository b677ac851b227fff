//! Run log ports (driven/secondary ports)
//!
//! Append-only records of completed uploads and failed runs.

use chrono::{DateTime, Utc};

use crate::domain::history::UploadHistoryEntry;

/// Port trait for the upload history log
#[async_trait::async_trait]
pub trait IHistoryLog: Send + Sync {
    /// Appends one entry
    async fn append(&self, entry: &UploadHistoryEntry) -> anyhow::Result<()>;

    /// Returns up to `limit` most recent entries, newest first
    ///
    /// Lines that cannot be parsed are skipped.
    async fn recent(&self, limit: usize) -> anyhow::Result<Vec<UploadHistoryEntry>>;
}

/// Port trait for the error log
#[async_trait::async_trait]
pub trait IErrorLog: Send + Sync {
    /// Appends a timestamped error line
    async fn record(&self, at: DateTime<Utc>, message: &str) -> anyhow::Result<()>;

    /// Returns up to `limit` last lines, oldest first
    async fn tail(&self, limit: usize) -> anyhow::Result<Vec<String>>;
}
