//! Archive service port (driven/secondary port)
//!
//! This module defines the interface for the remote archive/ingest service
//! that receives the packaged mirror. The primary implementation targets the
//! SleepHQ import API.
//!
//! A transfer is a three-step exchange: open an import session, upload the
//! archive into it, then ask the service to process the session. Any failed
//! step aborts the run before the sync state is saved.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Credentials resolved against the archive service
///
/// Obtained once per run by [`IArchiveService::connect`] and passed back
/// into every subsequent call.
#[derive(Clone, Serialize, Deserialize)]
pub struct ArchiveAccount {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// Team (tenant) that receives the imports
    pub team_id: String,
}

impl std::fmt::Debug for ArchiveAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveAccount")
            .field("access_token", &"<redacted>")
            .field("team_id", &self.team_id)
            .finish()
    }
}

/// A packaged mirror ready for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivePackage {
    /// Location of the archive on local disk
    pub path: PathBuf,
    /// File name announced to the service
    pub file_name: String,
    /// Archive size in bytes
    pub size_bytes: u64,
}

/// Port trait for the archive/ingest service
#[async_trait::async_trait]
pub trait IArchiveService: Send + Sync {
    /// Authenticates and resolves the target team
    async fn connect(&self) -> anyhow::Result<ArchiveAccount>;

    /// Opens a new import session
    ///
    /// # Returns
    /// The service-side session identifier
    async fn begin_session(&self, account: &ArchiveAccount) -> anyhow::Result<String>;

    /// Uploads the archive into the session
    ///
    /// # Arguments
    /// * `content_hash` - Digest of the uploaded content, forwarded to the service
    async fn upload(
        &self,
        account: &ArchiveAccount,
        session_id: &str,
        package: &ArchivePackage,
        content_hash: &str,
    ) -> anyhow::Result<()>;

    /// Starts server-side processing of the uploaded files
    async fn process(&self, account: &ArchiveAccount, session_id: &str) -> anyhow::Result<()>;
}
