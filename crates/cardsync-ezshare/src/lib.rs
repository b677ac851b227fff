//! cardsync ez Share - Wi-Fi SD card listing adapter
//!
//! The ez Share card serves its file tree as plain HTML pages. Every folder
//! page is a list of `<a>` links: subfolders link to another listing page,
//! files link to `download?file=...`.
//!
//! ## Modules
//!
//! - [`client`] - HTTP client with per-request timeouts
//! - [`listing`] - HTML listing parser
//! - [`provider`] - [`IRemoteListing`](cardsync_core::ports::IRemoteListing) implementation

pub mod client;
pub mod listing;
pub mod provider;

use thiserror::Error;

pub use client::EzShareClient;
pub use provider::EzShareListing;

/// Errors that can occur when talking to the ez Share card
#[derive(Debug, Error)]
pub enum EzShareError {
    /// A network-level error occurred (connection refused, timeout, ...)
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The card answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status {
        /// Requested URL
        url: String,
        /// Returned status code
        status: u16,
    },

    /// A folder label was not found in its parent listing
    #[error("Folder '{name}' not found in listing of {parent}")]
    FolderNotFound {
        /// Missing folder label
        name: String,
        /// Logical path of the parent folder
        parent: String,
    },

    /// A link could not be turned into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The listing page could not be parsed
    #[error("Invalid listing: {0}")]
    InvalidListing(String),

    /// The size probe returned a non-numeric Content-Length
    #[error("Invalid Content-Length '{value}' for {url}")]
    InvalidContentLength {
        /// Probed URL
        url: String,
        /// Header value as received
        value: String,
    },
}

/// Result type for ez Share operations
pub type Result<T> = std::result::Result<T, EzShareError>;
