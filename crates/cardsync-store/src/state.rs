//! Sync state file
//!
//! The record is rewritten in full on every save through a temporary file
//! and a rename, so a crash leaves either the previous or the new record.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use cardsync_core::{
    domain::{DateFolder, Fingerprint, SyncState},
    ports::IStateStore,
};

use crate::{read_optional, StoreError};

/// [`IStateStore`] backed by a small text file
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state; an absent file is the initial state
    pub async fn read(&self) -> Result<SyncState, StoreError> {
        let Some(content) = read_optional(&self.path).await? else {
            debug!(path = %self.path.display(), "No state file, starting fresh");
            return Ok(SyncState::default());
        };

        SyncState::parse_record(&content).map_err(|source| StoreError::CorruptState {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the state with `state`
    #[instrument(skip(self, state), fields(path = %self.path.display()))]
    pub async fn write(&self, state: &SyncState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp_path = {
            let mut p = self.path.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };
        tokio::fs::write(&tmp_path, state.to_record())
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl IStateStore for FileStateStore {
    async fn load(&self) -> anyhow::Result<SyncState> {
        Ok(self.read().await?)
    }

    async fn save(&self, folder: &DateFolder, fingerprint: &Fingerprint) -> anyhow::Result<()> {
        let state = SyncState::synced(folder.clone(), fingerprint.clone());
        self.write(&state).await?;
        debug!(folder = %folder, fingerprint = %fingerprint.short(), "State record written");
        Ok(())
    }
}
