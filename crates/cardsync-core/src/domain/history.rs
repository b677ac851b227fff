//! Upload history records
//!
//! One JSON object per line, append-only:
//!
//! ```text
//! {"date":"20250502","hash":"…","status":"success","duration_sec":12,"timestamp":"2025-05-02T07:15:03.120Z"}
//! ```
//!
//! Older files carry naive timestamps without an offset
//! (`2025-05-01T06:00:00.123456`); those are read as UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::newtypes::DateFolder;

/// Outcome recorded for a completed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Success,
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadStatus::Success => write!(f, "success"),
        }
    }
}

/// A single history log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadHistoryEntry {
    /// Latest folder included in the upload
    #[serde(rename = "date")]
    pub folder: DateFolder,
    /// Content digest sent along with the archive
    #[serde(rename = "hash")]
    pub fingerprint: String,
    pub status: UploadStatus,
    #[serde(rename = "duration_sec")]
    pub duration_seconds: u64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.ffffff]` taken as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(serde::de::Error::custom)
}

impl UploadHistoryEntry {
    /// A successful upload finishing now
    pub fn success(folder: DateFolder, fingerprint: impl Into<String>, duration_seconds: u64) -> Self {
        Self {
            folder,
            fingerprint: fingerprint.into(),
            status: UploadStatus::Success,
            duration_seconds,
            timestamp: Utc::now(),
        }
    }
}
