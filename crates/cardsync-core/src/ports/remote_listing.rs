//! Remote listing port (driven/secondary port)
//!
//! This module defines the interface for reading the device's directory
//! tree. The primary implementation targets the ez Share Wi-Fi SD card's
//! HTML listing pages, but the core only relies on the contract below.
//!
//! ## Ordering Requirement
//!
//! Implementations **must** return entries of a given folder in a stable,
//! repeatable order as long as the folder's content is unchanged. Remote
//! fingerprints digest entries in listing order, so an unstable order would
//! make an unchanged folder look modified.

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::RemotePath;

/// A single entry of a remote folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Label shown in the listing (file or folder name)
    pub name: String,
    /// Address used to probe or fetch the entry
    pub href: String,
    /// Whether this entry is a subfolder rather than a downloadable file
    pub is_container: bool,
}

impl RemoteEntry {
    /// Convenience constructor for a downloadable file
    pub fn file(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            is_container: false,
        }
    }

    /// Convenience constructor for a subfolder
    pub fn folder(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            is_container: true,
        }
    }
}

/// Port trait for the device's directory listing
///
/// All methods are expected to apply their own timeout and to fail rather
/// than hang; use cases map any failure to `SyncError::RemoteUnavailable`.
#[async_trait::async_trait]
pub trait IRemoteListing: Send + Sync {
    /// Lists the entries of the folder at `path`
    ///
    /// # Returns
    /// Entries in the device's listing order (see module docs)
    async fn list(&self, path: &RemotePath) -> anyhow::Result<Vec<RemoteEntry>>;

    /// Returns the size in bytes of the file at `href` without transferring
    /// its body
    async fn probe_size(&self, href: &str) -> anyhow::Result<u64>;

    /// Downloads the full body of the file at `href`
    ///
    /// Only the executor calls this; fingerprinting never does.
    async fn fetch(&self, href: &str) -> anyhow::Result<Vec<u8>>;
}
