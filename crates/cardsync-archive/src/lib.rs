//! cardsync Archive - SleepHQ import API adapter
//!
//! Provides:
//! - Password-grant authentication and team resolution
//! - Import sessions: create, upload one archive, start processing
//!
//! ## Modules
//!
//! - [`credentials`] - Credentials file loading
//! - [`client`] - SleepHQ HTTP client
//! - [`service`] - [`IArchiveService`](cardsync_core::ports::IArchiveService) implementation

pub mod client;
pub mod credentials;
pub mod service;

use thiserror::Error;

pub use client::SleepHqClient;
pub use credentials::ArchiveCredentials;
pub use service::SleepHqArchive;

/// Errors that can occur when talking to the archive service
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{operation} failed with HTTP {status}: {body}")]
    Status {
        /// Operation that was attempted
        operation: &'static str,
        /// Returned status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The response could not be parsed or was missing fields
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The account has no team to import into
    #[error("No team found for this account")]
    NoTeam,

    /// The credentials file is missing or malformed
    #[error("Invalid credentials file: {0}")]
    Credentials(String),

    /// Reading the archive from disk failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for archive operations
pub type Result<T> = std::result::Result<T, ArchiveError>;
