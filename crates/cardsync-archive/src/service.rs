//! [`IArchiveService`] implementation for SleepHQ

use std::path::PathBuf;

use anyhow::Context;

use cardsync_core::ports::{ArchiveAccount, ArchivePackage, IArchiveService};

use crate::{client::SleepHqClient, credentials::ArchiveCredentials};

/// Archive service backed by the SleepHQ import API
///
/// Credentials are read from disk on every [`connect`](IArchiveService::connect)
/// so that commands which never upload do not need them.
pub struct SleepHqArchive {
    client: SleepHqClient,
    credentials_file: PathBuf,
}

impl SleepHqArchive {
    /// Creates a new SleepHqArchive
    pub fn new(client: SleepHqClient, credentials_file: PathBuf) -> Self {
        Self {
            client,
            credentials_file,
        }
    }
}

#[async_trait::async_trait]
impl IArchiveService for SleepHqArchive {
    async fn connect(&self) -> anyhow::Result<ArchiveAccount> {
        let credentials = ArchiveCredentials::load(&self.credentials_file)?;
        let access_token = self
            .client
            .request_token(&credentials)
            .await
            .context("Failed to retrieve access token")?;
        let team_id = self
            .client
            .first_team(&access_token)
            .await
            .context("Failed to fetch team")?;
        Ok(ArchiveAccount {
            access_token,
            team_id,
        })
    }

    async fn begin_session(&self, account: &ArchiveAccount) -> anyhow::Result<String> {
        self.client
            .create_import(&account.access_token, &account.team_id)
            .await
            .context("Failed to create import session")
    }

    async fn upload(
        &self,
        account: &ArchiveAccount,
        session_id: &str,
        package: &ArchivePackage,
        content_hash: &str,
    ) -> anyhow::Result<()> {
        self.client
            .upload_file(
                &account.access_token,
                session_id,
                &package.path,
                &package.file_name,
                content_hash,
            )
            .await
            .context("Upload failed")
    }

    async fn process(&self, account: &ArchiveAccount, session_id: &str) -> anyhow::Result<()> {
        self.client
            .process_import(&account.access_token, session_id)
            .await
            .context("Failed to start import processing")
    }
}
