//! Shared doubles and wiring for the run-record tests

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::bail;

use cardsync_core::{
    domain::{Fingerprint, RemotePath},
    ports::{
        ArchiveAccount, ArchivePackage, IArchiveService, ILocalMirror, INetworkSwitch,
        IRemoteListing, RemoteEntry,
    },
    usecases::{SyncContext, SyncExecutor, SyncOptions},
};
use cardsync_store::{FileStateStore, JsonlHistoryLog, TextErrorLog};

pub const FILE_SIZE: u64 = 1024;

/// Card with one `<date>_BRP.edf` file per date folder
pub struct Card {
    folders: Vec<String>,
}

impl Card {
    pub fn new(folders: &[&str]) -> Self {
        Self {
            folders: folders.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[async_trait::async_trait]
impl IRemoteListing for Card {
    async fn list(&self, path: &RemotePath) -> anyhow::Result<Vec<RemoteEntry>> {
        match path.as_str() {
            "/DATALOG" => Ok(self
                .folders
                .iter()
                .map(|f| RemoteEntry::folder(f.clone(), format!("dir?{f}")))
                .collect()),
            other => match other.strip_prefix("/DATALOG/") {
                Some(date) if self.folders.iter().any(|f| f == date) => Ok(vec![
                    RemoteEntry::file(format!("{date}_BRP.edf"), format!("dl?{date}")),
                ]),
                _ => bail!("no such folder: {other}"),
            },
        }
    }

    async fn probe_size(&self, _href: &str) -> anyhow::Result<u64> {
        Ok(FILE_SIZE)
    }

    async fn fetch(&self, _href: &str) -> anyhow::Result<Vec<u8>> {
        Ok(vec![7u8; FILE_SIZE as usize])
    }
}

pub struct Switch;

#[async_trait::async_trait]
impl INetworkSwitch for Switch {
    async fn activate(&self, _profile: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Archive that accepts everything unless told to reject the upload
#[derive(Default)]
pub struct Archive {
    reject_upload: AtomicBool,
}

impl Archive {
    pub fn rejecting_upload() -> Self {
        let archive = Self::default();
        archive.reject_upload.store(true, Ordering::SeqCst);
        archive
    }
}

#[async_trait::async_trait]
impl IArchiveService for Archive {
    async fn connect(&self) -> anyhow::Result<ArchiveAccount> {
        Ok(ArchiveAccount {
            access_token: "token".to_string(),
            team_id: "77".to_string(),
        })
    }

    async fn begin_session(&self, _account: &ArchiveAccount) -> anyhow::Result<String> {
        Ok("9001".to_string())
    }

    async fn upload(
        &self,
        _account: &ArchiveAccount,
        _session_id: &str,
        _package: &ArchivePackage,
        _content_hash: &str,
    ) -> anyhow::Result<()> {
        if self.reject_upload.load(Ordering::SeqCst) {
            bail!("HTTP 500 from import files");
        }
        Ok(())
    }

    async fn process(&self, _account: &ArchiveAccount, _session_id: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Mirror that keeps nothing
pub struct Mirror;

#[async_trait::async_trait]
impl ILocalMirror for Mirror {
    async fn reset(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn write_file(&self, _relative: &Path, _data: &[u8]) -> anyhow::Result<()> {
        Ok(())
    }

    async fn package(&self) -> anyhow::Result<ArchivePackage> {
        Ok(ArchivePackage {
            path: PathBuf::from("upload.zip"),
            file_name: "upload.zip".to_string(),
            size_bytes: 0,
        })
    }

    async fn content_digest(&self, _relative_dir: &Path) -> anyhow::Result<Fingerprint> {
        Ok(Fingerprint::from_digest(&[0u8; 32]))
    }
}

/// Record files under one directory
pub struct RecordFiles {
    pub state: PathBuf,
    pub history: PathBuf,
    pub errors: PathBuf,
}

impl RecordFiles {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            state: dir.join("last_sync.txt"),
            history: dir.join("upload_history.jsonl"),
            errors: dir.join("upload_errors.log"),
        }
    }
}

pub fn executor(card: Card, archive: Archive, files: &RecordFiles) -> SyncExecutor {
    let ctx = SyncContext {
        listing: Arc::new(card),
        network: Arc::new(Switch),
        archive: Arc::new(archive),
        mirror: Arc::new(Mirror),
        state_store: Arc::new(FileStateStore::new(files.state.clone())),
        history: Arc::new(JsonlHistoryLog::new(files.history.clone())),
        error_log: Arc::new(TextErrorLog::new(files.errors.clone())),
    };
    let options = SyncOptions {
        companion_folders: Vec::new(),
        include_root_files: false,
        ..SyncOptions::default()
    };
    SyncExecutor::new(ctx, options)
}
