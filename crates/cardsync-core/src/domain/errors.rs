//! Domain error types
//!
//! This module defines error types specific to domain operations
//! (validation of folder names, fingerprints and persisted records) and the
//! run-level taxonomy that the synchronization use cases report.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Folder name is not an 8-digit `YYYYMMDD` string
    #[error("Invalid date folder: {0}")]
    InvalidDateFolder(String),

    /// Fingerprint is not a 64-character lowercase hex digest
    #[error("Invalid fingerprint: {0}")]
    InvalidFingerprint(String),

    /// Invalid remote path format
    #[error("Invalid remote path: {0}")]
    InvalidRemotePath(String),

    /// Persisted state record could not be understood
    #[error("Invalid state record: {0}")]
    InvalidStateRecord(String),
}

/// Errors that abort a synchronization run
///
/// Every variant carries a rendered message rather than the adapter's error
/// value: adapters report through `anyhow`, and the run boundary only needs
/// the category plus a human-readable explanation for the error log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A listing, metadata probe or download against the device failed
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Switching the host network profile failed
    #[error("Network switch failed: {0}")]
    NetworkSwitchFailure(String),

    /// The archive service rejected authentication, upload or processing
    #[error("Transfer failed: {0}")]
    TransferFailure(String),

    /// The local staging mirror could not be written or packaged
    #[error("Local mirror error: {0}")]
    Mirror(String),

    /// The persisted state could not be read or written
    #[error("State error: {0}")]
    State(String),
}

impl SyncError {
    /// Wraps an adapter error from the device as [`SyncError::RemoteUnavailable`]
    pub fn remote(err: anyhow::Error) -> Self {
        Self::RemoteUnavailable(format!("{err:#}"))
    }

    /// Wraps an adapter error from the network switch
    pub fn network(err: anyhow::Error) -> Self {
        Self::NetworkSwitchFailure(format!("{err:#}"))
    }

    /// Wraps an adapter error from the archive service
    pub fn transfer(err: anyhow::Error) -> Self {
        Self::TransferFailure(format!("{err:#}"))
    }

    /// Wraps an adapter error from the local mirror
    pub fn mirror(err: anyhow::Error) -> Self {
        Self::Mirror(format!("{err:#}"))
    }

    /// Wraps an adapter error from the state store
    pub fn state(err: anyhow::Error) -> Self {
        Self::State(format!("{err:#}"))
    }

    /// Short machine-readable category name
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::RemoteUnavailable(_) => "remote_unavailable",
            SyncError::NetworkSwitchFailure(_) => "network_switch_failure",
            SyncError::TransferFailure(_) => "transfer_failure",
            SyncError::Mirror(_) => "mirror",
            SyncError::State(_) => "state",
        }
    }
}
