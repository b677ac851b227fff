//! cardsync Store - Durable run records
//!
//! Plain files under the data directory:
//!
//! - [`FileStateStore`] - `last_sync.txt`, the two-line sync state record
//! - [`JsonlHistoryLog`] - `upload_history.jsonl`, one JSON object per upload
//! - [`TextErrorLog`] - `upload_errors.log`, one timestamped line per failed run
//!
//! ## Architecture
//!
//! Implements the `IStateStore`, `IHistoryLog` and `IErrorLog` ports from
//! `cardsync-core`. Errors are reported as [`StoreError`] and cross the
//! port boundary as `anyhow::Error`.

pub mod error_log;
pub mod history;
pub mod state;

pub use error_log::TextErrorLog;
pub use history::JsonlHistoryLog;
pub use state::FileStateStore;

use std::path::PathBuf;

use cardsync_core::domain::DomainError;

/// Errors that can occur in the file-backed stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a record file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but does not hold a valid record
    #[error("Corrupt state file {path}: {source}")]
    CorruptState {
        path: PathBuf,
        #[source]
        source: DomainError,
    },

    /// A history entry could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Appends `line` to `path`, creating the file and its parent directory
pub(crate) async fn append_line(path: &std::path::Path, line: &str) -> Result<(), StoreError> {
    use tokio::io::AsyncWriteExt;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    file.write_all(line.as_bytes())
        .await
        .map_err(|e| StoreError::io(path, e))?;
    file.flush().await.map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

/// Reads `path` as text; a missing file reads as `None`
pub(crate) async fn read_optional(path: &std::path::Path) -> Result<Option<String>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(path, e)),
    }
}
