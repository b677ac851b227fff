//! Upload history (JSON lines)

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use cardsync_core::{domain::UploadHistoryEntry, ports::IHistoryLog};

use crate::{append_line, read_optional, StoreError};

/// [`IHistoryLog`] writing one JSON object per line
#[derive(Debug, Clone)]
pub struct JsonlHistoryLog {
    path: PathBuf,
}

impl JsonlHistoryLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses every valid line, oldest first
    pub async fn entries(&self) -> Result<Vec<UploadHistoryEntry>, StoreError> {
        let Some(content) = read_optional(&self.path).await? else {
            return Ok(Vec::new());
        };

        let entries = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(index, line)| match serde_json::from_str(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(line = index + 1, error = %e, "Skipping malformed history line");
                    None
                }
            })
            .collect();
        Ok(entries)
    }
}

#[async_trait::async_trait]
impl IHistoryLog for JsonlHistoryLog {
    async fn append(&self, entry: &UploadHistoryEntry) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(entry).map_err(StoreError::from)?;
        line.push('\n');
        append_line(&self.path, &line).await?;
        debug!(folder = %entry.folder, path = %self.path.display(), "History entry appended");
        Ok(())
    }

    async fn recent(&self, limit: usize) -> anyhow::Result<Vec<UploadHistoryEntry>> {
        let entries = self.entries().await?;
        Ok(entries.into_iter().rev().take(limit).collect())
    }
}
