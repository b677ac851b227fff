//! Persisted synchronization state
//!
//! The state is the only durable record shared between runs: the last date
//! folder that was synchronized end-to-end and the remote fingerprint that
//! folder had at the time. The record format is two key-value lines:
//!
//! ```text
//! date=20250501
//! hash=3f1c...e9
//! ```

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{DateFolder, Fingerprint};

/// Last successfully synchronized folder and its fingerprint
///
/// The zero value (both fields `None`) means no run has completed yet and
/// the next plan performs a full initial sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub last_folder: Option<DateFolder>,
    pub last_fingerprint: Option<Fingerprint>,
}

impl SyncState {
    /// State after a successful synchronization of `folder`
    pub fn synced(folder: DateFolder, fingerprint: Fingerprint) -> Self {
        Self {
            last_folder: Some(folder),
            last_fingerprint: Some(fingerprint),
        }
    }

    /// Returns true if nothing has ever been synchronized
    pub fn is_initial(&self) -> bool {
        self.last_folder.is_none()
    }

    /// Renders the record as written to disk
    pub fn to_record(&self) -> String {
        let date = self.last_folder.as_ref().map(|f| f.as_str()).unwrap_or("");
        let hash = self
            .last_fingerprint
            .as_ref()
            .map(|f| f.as_str())
            .unwrap_or("");
        format!("date={date}\nhash={hash}\n")
    }

    /// Parses a record
    ///
    /// Unknown lines are ignored and empty values read as absent. A later
    /// duplicate key wins.
    ///
    /// # Errors
    /// Returns error if a present value is not a valid folder or fingerprint
    pub fn parse_record(content: &str) -> Result<Self, DomainError> {
        let mut state = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if let Some(value) = line.strip_prefix("date=") {
                state.last_folder = if value.is_empty() {
                    None
                } else {
                    Some(DateFolder::new(value.to_string()).map_err(|e| {
                        DomainError::InvalidStateRecord(format!("date: {e}"))
                    })?)
                };
            } else if let Some(value) = line.strip_prefix("hash=") {
                state.last_fingerprint = if value.is_empty() {
                    None
                } else {
                    Some(Fingerprint::new(value.to_string()).map_err(|e| {
                        DomainError::InvalidStateRecord(format!("hash: {e}"))
                    })?)
                };
            }
        }

        Ok(state)
    }
}
