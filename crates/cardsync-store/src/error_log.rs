//! Error log
//!
//! Plain text, one failed run per line:
//!
//! ```text
//! 2025-05-02T07:15:03Z - Remote unavailable: GET http://192.168.4.1/dir: timed out
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use cardsync_core::ports::IErrorLog;

use crate::{append_line, read_optional};

/// [`IErrorLog`] appending timestamped lines to a text file
#[derive(Debug, Clone)]
pub struct TextErrorLog {
    path: PathBuf,
}

impl TextErrorLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Formats a log line; embedded line breaks are flattened
pub fn format_line(at: DateTime<Utc>, message: &str) -> String {
    let flat: String = message
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    format!("{} - {}\n", at.to_rfc3339_opts(SecondsFormat::Secs, true), flat)
}

#[async_trait::async_trait]
impl IErrorLog for TextErrorLog {
    async fn record(&self, at: DateTime<Utc>, message: &str) -> anyhow::Result<()> {
        append_line(&self.path, &format_line(at, message)).await?;
        debug!(path = %self.path.display(), "Error recorded");
        Ok(())
    }

    async fn tail(&self, limit: usize) -> anyhow::Result<Vec<String>> {
        let Some(content) = read_optional(&self.path).await? else {
            return Ok(Vec::new());
        };
        let lines: Vec<&str> = content.lines().filter(|l| !l.is_empty()).collect();
        let skip = lines.len().saturating_sub(limit);
        Ok(lines[skip..].iter().map(|l| l.to_string()).collect())
    }
}
