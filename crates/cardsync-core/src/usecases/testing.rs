//! In-memory port implementations shared by the use case tests

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, bail};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::domain::{DateFolder, Fingerprint, RemotePath, SyncState, UploadHistoryEntry};
use crate::ports::{
    ArchiveAccount, ArchivePackage, IArchiveService, IErrorLog, IHistoryLog, ILocalMirror,
    INetworkSwitch, IRemoteListing, IStateStore, RemoteEntry,
};

// ============================================================================
// Device listing
// ============================================================================

#[derive(Default)]
pub struct FakeListing {
    folders: Mutex<HashMap<String, Vec<RemoteEntry>>>,
    sizes: Mutex<HashMap<String, u64>>,
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    failing_probes: Mutex<HashSet<String>>,
    failing_fetches: Mutex<HashSet<String>>,
    listed: Mutex<Vec<String>>,
    probed: Mutex<Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl FakeListing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_folder(&self, path: &str, entries: Vec<RemoteEntry>) {
        self.folders.lock().unwrap().insert(path.to_string(), entries);
    }

    pub fn set_size(&self, href: &str, size: u64) {
        self.sizes.lock().unwrap().insert(href.to_string(), size);
    }

    pub fn set_body(&self, href: &str, body: &[u8]) {
        self.bodies.lock().unwrap().insert(href.to_string(), body.to_vec());
    }

    pub fn fail_probe(&self, href: &str) {
        self.failing_probes.lock().unwrap().insert(href.to_string());
    }

    pub fn fail_fetch(&self, href: &str) {
        self.failing_fetches.lock().unwrap().insert(href.to_string());
    }

    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().unwrap().clone()
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// Builds a typical card: a root file, SETTINGS, and DATALOG with the
    /// given date folders, each holding two whitelisted files and one
    /// ignored file.
    pub fn with_card(dates: &[&str]) -> Self {
        let listing = Self::new();
        listing.add_folder(
            "/",
            vec![
                RemoteEntry::file("Identification.json", "dl?id"),
                RemoteEntry::file("readme.txt", "dl?readme"),
                RemoteEntry::folder("SETTINGS", "dir?settings"),
                RemoteEntry::folder("DATALOG", "dir?datalog"),
            ],
        );
        listing.add_folder(
            "/SETTINGS",
            vec![RemoteEntry::file("CurrentSettings.json", "dl?settings")],
        );
        listing.add_folder(
            "/DATALOG",
            dates
                .iter()
                .map(|d| RemoteEntry::folder(*d, format!("dir?{d}")))
                .collect(),
        );
        for date in dates {
            listing.add_date_folder(date, 100);
        }
        listing
    }

    /// (Re)defines a date folder whose BRP file has `brp_size` bytes
    pub fn add_date_folder(&self, date: &str, brp_size: u64) {
        let brp = format!("dl?{date}_BRP");
        let crc = format!("dl?{date}_CRC");
        self.add_folder(
            &format!("/DATALOG/{date}"),
            vec![
                RemoteEntry::file(format!("{date}_BRP.edf"), brp.clone()),
                RemoteEntry::file(format!("{date}_BRP.crc"), crc.clone()),
                RemoteEntry::file("thumb.jpg", format!("dl?{date}_thumb")),
            ],
        );
        self.set_size(&brp, brp_size);
        self.set_size(&crc, 4);
        self.set_body(&brp, &vec![b'x'; brp_size as usize]);
        self.set_body(&crc, b"crc!");
    }
}

#[async_trait::async_trait]
impl IRemoteListing for FakeListing {
    async fn list(&self, path: &RemotePath) -> anyhow::Result<Vec<RemoteEntry>> {
        self.listed.lock().unwrap().push(path.to_string());
        self.folders
            .lock()
            .unwrap()
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("no such folder: {path}"))
    }

    async fn probe_size(&self, href: &str) -> anyhow::Result<u64> {
        self.probed.lock().unwrap().push(href.to_string());
        if self.failing_probes.lock().unwrap().contains(href) {
            bail!("HEAD {href} timed out");
        }
        Ok(self.sizes.lock().unwrap().get(href).copied().unwrap_or(0))
    }

    async fn fetch(&self, href: &str) -> anyhow::Result<Vec<u8>> {
        self.fetched.lock().unwrap().push(href.to_string());
        if self.failing_fetches.lock().unwrap().contains(href) {
            bail!("GET {href} failed");
        }
        Ok(self
            .bodies
            .lock()
            .unwrap()
            .get(href)
            .cloned()
            .unwrap_or_else(|| href.as_bytes().to_vec()))
    }
}

// ============================================================================
// Network switch
// ============================================================================

#[derive(Default)]
pub struct FakeSwitch {
    activations: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
}

impl FakeSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, profile: &str) {
        self.failing.lock().unwrap().insert(profile.to_string());
    }

    pub fn activations(&self) -> Vec<String> {
        self.activations.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl INetworkSwitch for FakeSwitch {
    async fn activate(&self, profile: &str) -> anyhow::Result<()> {
        self.activations.lock().unwrap().push(profile.to_string());
        if self.failing.lock().unwrap().contains(profile) {
            bail!("nmcli connection up {profile} exited with status 10");
        }
        Ok(())
    }
}

// ============================================================================
// Archive service
// ============================================================================

#[derive(Default)]
pub struct FakeArchive {
    calls: Mutex<Vec<String>>,
    failing_step: Mutex<Option<&'static str>>,
    uploaded_hashes: Mutex<Vec<String>>,
}

impl FakeArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes one of `connect`, `begin`, `upload`, `process` fail
    pub fn fail_at(&self, step: &'static str) {
        *self.failing_step.lock().unwrap() = Some(step);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn uploaded_hashes(&self) -> Vec<String> {
        self.uploaded_hashes.lock().unwrap().clone()
    }

    fn step(&self, name: &'static str) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(name.to_string());
        if *self.failing_step.lock().unwrap() == Some(name) {
            bail!("{name} rejected: HTTP 500");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl IArchiveService for FakeArchive {
    async fn connect(&self) -> anyhow::Result<ArchiveAccount> {
        self.step("connect")?;
        Ok(ArchiveAccount {
            access_token: "token".to_string(),
            team_id: "42".to_string(),
        })
    }

    async fn begin_session(&self, _account: &ArchiveAccount) -> anyhow::Result<String> {
        self.step("begin")?;
        Ok("import-1".to_string())
    }

    async fn upload(
        &self,
        _account: &ArchiveAccount,
        session_id: &str,
        package: &ArchivePackage,
        content_hash: &str,
    ) -> anyhow::Result<()> {
        self.step("upload")?;
        assert_eq!(session_id, "import-1");
        assert!(package.size_bytes > 0);
        self.uploaded_hashes.lock().unwrap().push(content_hash.to_string());
        Ok(())
    }

    async fn process(&self, _account: &ArchiveAccount, session_id: &str) -> anyhow::Result<()> {
        self.step("process")?;
        assert_eq!(session_id, "import-1");
        Ok(())
    }
}

// ============================================================================
// Local mirror
// ============================================================================

#[derive(Default)]
pub struct FakeMirror {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    resets: Mutex<u32>,
    packages: Mutex<u32>,
}

impl FakeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.files
            .lock()
            .unwrap()
            .keys()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    pub fn resets(&self) -> u32 {
        *self.resets.lock().unwrap()
    }

    pub fn packages(&self) -> u32 {
        *self.packages.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ILocalMirror for FakeMirror {
    async fn reset(&self) -> anyhow::Result<()> {
        self.files.lock().unwrap().clear();
        *self.resets.lock().unwrap() += 1;
        Ok(())
    }

    async fn write_file(&self, relative: &Path, data: &[u8]) -> anyhow::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(relative.to_path_buf(), data.to_vec());
        Ok(())
    }

    async fn package(&self) -> anyhow::Result<ArchivePackage> {
        *self.packages.lock().unwrap() += 1;
        let size: usize = self.files.lock().unwrap().values().map(Vec::len).sum();
        Ok(ArchivePackage {
            path: PathBuf::from("/tmp/upload.zip"),
            file_name: "upload.zip".to_string(),
            size_bytes: size as u64,
        })
    }

    async fn content_digest(&self, relative_dir: &Path) -> anyhow::Result<Fingerprint> {
        let mut hasher = Sha256::new();
        for (path, data) in self.files.lock().unwrap().iter() {
            if path.starts_with(relative_dir) {
                hasher.update(data);
            }
        }
        Ok(Fingerprint::from_digest(&hasher.finalize()))
    }
}

// ============================================================================
// State and run logs
// ============================================================================

#[derive(Default)]
pub struct MemoryStateStore {
    state: Mutex<SyncState>,
    saves: Mutex<u32>,
}

impl MemoryStateStore {
    pub fn with_state(state: SyncState) -> Self {
        Self {
            state: Mutex::new(state),
            saves: Mutex::new(0),
        }
    }

    pub fn state(&self) -> SyncState {
        self.state.lock().unwrap().clone()
    }

    pub fn saves(&self) -> u32 {
        *self.saves.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl IStateStore for MemoryStateStore {
    async fn load(&self) -> anyhow::Result<SyncState> {
        Ok(self.state())
    }

    async fn save(&self, folder: &DateFolder, fingerprint: &Fingerprint) -> anyhow::Result<()> {
        *self.state.lock().unwrap() = SyncState::synced(folder.clone(), fingerprint.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<UploadHistoryEntry>>,
}

impl MemoryHistory {
    pub fn entries(&self) -> Vec<UploadHistoryEntry> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IHistoryLog for MemoryHistory {
    async fn append(&self, entry: &UploadHistoryEntry) -> anyhow::Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn recent(&self, limit: usize) -> anyhow::Result<Vec<UploadHistoryEntry>> {
        Ok(self.entries().into_iter().rev().take(limit).collect())
    }
}

#[derive(Default)]
pub struct MemoryErrorLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryErrorLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IErrorLog for MemoryErrorLog {
    async fn record(&self, at: DateTime<Utc>, message: &str) -> anyhow::Result<()> {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{} - {message}", at.to_rfc3339()));
        Ok(())
    }

    async fn tail(&self, limit: usize) -> anyhow::Result<Vec<String>> {
        let lines = self.lines();
        let skip = lines.len().saturating_sub(limit);
        Ok(lines.into_iter().skip(skip).collect())
    }
}
