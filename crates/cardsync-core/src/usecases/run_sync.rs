//! Sync execution use case
//!
//! Drives one end-to-end run:
//!
//! 1. Authenticate against the archive service (requires the home network)
//! 2. Switch to the device network profile
//! 3. Load state, discover date folders, plan
//! 4. Mirror root files, companion folders and the planned date folders
//! 5. Package the mirror and fingerprint the latest folder
//! 6. Switch back to the home profile
//! 7. Open an import session, upload, request processing
//! 8. Save the state, append a history entry
//!
//! The state is only saved after step 7 succeeded in full, so any failure
//! leaves the previous state untouched and the next run retries the same
//! range. The home profile is restored on every exit path after step 2.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    domain::{
        DateFolder, FileEntry, Fingerprint, PlannedSync, RemotePath, SyncError, SyncPlan,
        SyncState, UploadHistoryEntry, Whitelist,
    },
    ports::{
        ArchiveAccount, ArchivePackage, IArchiveService, IErrorLog, IHistoryLog, ILocalMirror,
        INetworkSwitch, IRemoteListing, IStateStore, RemoteEntry,
    },
    usecases::{network_lease::NetworkLease, plan_sync::SyncPlanner},
};

// ============================================================================
// Context and options
// ============================================================================

/// Adapters a run operates on
#[derive(Clone)]
pub struct SyncContext {
    pub listing: Arc<dyn IRemoteListing>,
    pub network: Arc<dyn INetworkSwitch>,
    pub archive: Arc<dyn IArchiveService>,
    pub mirror: Arc<dyn ILocalMirror>,
    pub state_store: Arc<dyn IStateStore>,
    pub history: Arc<dyn IHistoryLog>,
    pub error_log: Arc<dyn IErrorLog>,
}

/// Run parameters resolved from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Network profile that reaches the device
    pub device_profile: String,
    /// Network profile restored after the device phase
    pub home_profile: String,
    /// Remote folder holding the date folders
    pub data_root: RemotePath,
    /// Remote top-level folders mirrored in full on every transfer
    pub companion_folders: Vec<String>,
    /// Whether files at the remote root are mirrored
    pub include_root_files: bool,
    pub whitelist: Whitelist,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            device_profile: "ezshare".to_string(),
            home_profile: "homewifi".to_string(),
            data_root: RemotePath::root()
                .join("DATALOG")
                .unwrap_or_else(|_| RemotePath::root()),
            companion_folders: vec!["SETTINGS".to_string()],
            include_root_files: true,
            whitelist: Whitelist::default(),
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Counters for the mirroring step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferStats {
    /// Files downloaded into the mirror
    pub files: u32,
    /// Bytes downloaded into the mirror
    pub bytes: u64,
    /// Files left out by the whitelist
    pub skipped: u32,
}

/// Details of a completed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadSummary {
    pub plan: PlannedSync,
    /// Folder recorded as last synchronized
    pub latest_folder: DateFolder,
    /// Remote fingerprint recorded for `latest_folder`
    pub fingerprint: Fingerprint,
    /// Digest of the local copy of `latest_folder`, sent to the archive
    pub content_hash: Fingerprint,
    pub session_id: String,
    pub stats: TransferStats,
    pub archive_bytes: u64,
    /// Wall time of the upload and processing requests
    pub duration_seconds: u64,
}

/// Result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Nothing new and nothing changed
    UpToDate,
    /// A forced plan selected no folder (override past every remote folder)
    NoData { plan: PlannedSync },
    /// Data was uploaded and the state advanced
    Uploaded(Box<UploadSummary>),
    /// The run aborted; the state was left untouched
    Failed(SyncError),
}

impl RunOutcome {
    /// Returns true unless the run failed
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Failed(_))
    }

    /// The error of a failed run
    pub fn error(&self) -> Option<&SyncError> {
        match self {
            RunOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What a run would do, computed without mirroring anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanPreview {
    pub state: SyncState,
    pub remote_folders: Vec<DateFolder>,
    pub plan: SyncPlan,
}

/// Remote fingerprint of one folder with the entries it was computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderFingerprint {
    pub folder: DateFolder,
    pub entries: Vec<FileEntry>,
    pub fingerprint: Fingerprint,
}

enum DevicePhase {
    UpToDate,
    NoData(PlannedSync),
    Ready(Box<Mirrored>),
}

struct Mirrored {
    planned: PlannedSync,
    latest: DateFolder,
    fingerprint: Fingerprint,
    content_hash: Fingerprint,
    package: ArchivePackage,
    stats: TransferStats,
}

// ============================================================================
// Executor
// ============================================================================

/// Executes synchronization runs
pub struct SyncExecutor {
    ctx: SyncContext,
    options: SyncOptions,
    planner: SyncPlanner,
}

impl SyncExecutor {
    /// Creates a new SyncExecutor
    pub fn new(ctx: SyncContext, options: SyncOptions) -> Self {
        let planner = SyncPlanner::new(
            Arc::clone(&ctx.listing),
            options.whitelist.clone(),
            options.data_root.clone(),
        );
        Self {
            ctx,
            options,
            planner,
        }
    }

    pub fn planner(&self) -> &SyncPlanner {
        &self.planner
    }

    /// Runs once, recording any failure in the error log
    ///
    /// Never returns an error: failures are reported as
    /// [`RunOutcome::Failed`] after being logged.
    pub async fn run(&self, override_start: Option<&DateFolder>) -> RunOutcome {
        let started = Instant::now();
        info!(
            override_start = override_start.map(DateFolder::as_str),
            "Sync run started"
        );

        match self.try_run(override_start).await {
            Ok(outcome) => {
                info!(
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Sync run finished"
                );
                outcome
            }
            Err(err) => {
                self.record_failure(&err).await;
                RunOutcome::Failed(err)
            }
        }
    }

    /// Runs once, propagating the first error
    pub async fn try_run(&self, override_start: Option<&DateFolder>) -> Result<RunOutcome, SyncError> {
        let account = self
            .ctx
            .archive
            .connect()
            .await
            .map_err(SyncError::transfer)?;
        debug!(team = %account.team_id, "Archive account resolved");

        let lease = self.acquire_device().await?;
        let phase = self.device_phase(override_start).await;
        let phase = lease.release_with(phase).await?;

        match phase {
            DevicePhase::UpToDate => Ok(RunOutcome::UpToDate),
            DevicePhase::NoData(plan) => {
                warn!(start = %plan.start_folder, "Start date is past every remote folder, nothing to upload");
                Ok(RunOutcome::NoData { plan })
            }
            DevicePhase::Ready(mirrored) => {
                let summary = self.transfer_phase(&account, *mirrored).await?;
                Ok(RunOutcome::Uploaded(Box::new(summary)))
            }
        }
    }

    /// Plans without mirroring or uploading anything
    pub async fn plan_only(&self, override_start: Option<&DateFolder>) -> Result<PlanPreview, SyncError> {
        let lease = self.acquire_device().await?;
        let preview = async {
            let state = self.load_state().await?;
            let remote_folders = self.planner.discover_date_folders().await?;
            let plan = self
                .planner
                .plan(&remote_folders, &state, override_start)
                .await?;
            Ok::<_, SyncError>(PlanPreview {
                state,
                remote_folders,
                plan,
            })
        }
        .await;
        lease.release_with(preview).await
    }

    /// Computes the remote fingerprint of a single folder
    pub async fn fingerprint_folder(&self, folder: &DateFolder) -> Result<FolderFingerprint, SyncError> {
        let lease = self.acquire_device().await?;
        let result = async {
            let entries = self.planner.detector().inspect_folder(folder).await?;
            let fingerprint = crate::usecases::ChangeDetector::fingerprint_entries(&entries);
            Ok::<_, SyncError>(FolderFingerprint {
                folder: folder.clone(),
                entries,
                fingerprint,
            })
        }
        .await;
        lease.release_with(result).await
    }

    // ------------------------------------------------------------------------
    // Phases
    // ------------------------------------------------------------------------

    async fn acquire_device(&self) -> Result<NetworkLease, SyncError> {
        NetworkLease::acquire(
            Arc::clone(&self.ctx.network),
            &self.options.device_profile,
            &self.options.home_profile,
        )
        .await
    }

    async fn load_state(&self) -> Result<SyncState, SyncError> {
        let state = self.ctx.state_store.load().await.map_err(SyncError::state)?;
        info!(
            last_folder = state.last_folder.as_ref().map(DateFolder::as_str),
            last_fingerprint = state.last_fingerprint.as_ref().map(Fingerprint::short),
            "Loaded sync state"
        );
        Ok(state)
    }

    async fn device_phase(&self, override_start: Option<&DateFolder>) -> Result<DevicePhase, SyncError> {
        let state = self.load_state().await?;
        let remote_folders = self.planner.discover_date_folders().await?;
        let planned = match self
            .planner
            .plan(&remote_folders, &state, override_start)
            .await?
        {
            SyncPlan::NoOp => return Ok(DevicePhase::UpToDate),
            SyncPlan::Execute(planned) => planned,
        };
        let Some(latest) = planned.latest().cloned() else {
            return Ok(DevicePhase::NoData(planned));
        };

        self.ctx.mirror.reset().await.map_err(SyncError::mirror)?;
        let mut stats = TransferStats::default();
        self.mirror_companions(&mut stats).await?;

        let data_dir = self.local_data_dir();
        for folder in &planned.folders_to_fetch {
            let remote = self.planner.detector().folder_path(folder)?;
            let entries = self.ctx.listing.list(&remote).await.map_err(SyncError::remote)?;
            info!(folder = %folder, entries = entries.len(), "Mirroring date folder");
            self.mirror_entries(&entries, &data_dir.join(folder.as_str()), &mut stats)
                .await?;
        }
        info!(
            files = stats.files,
            bytes = stats.bytes,
            skipped = stats.skipped,
            "Mirror complete"
        );

        let package = self.ctx.mirror.package().await.map_err(SyncError::mirror)?;
        let content_hash = self
            .ctx
            .mirror
            .content_digest(&data_dir.join(latest.as_str()))
            .await
            .map_err(SyncError::mirror)?;
        let fingerprint = self.planner.detector().compute_fingerprint(&latest).await?;

        Ok(DevicePhase::Ready(Box::new(Mirrored {
            planned,
            latest,
            fingerprint,
            content_hash,
            package,
            stats,
        })))
    }

    async fn transfer_phase(
        &self,
        account: &ArchiveAccount,
        mirrored: Mirrored,
    ) -> Result<UploadSummary, SyncError> {
        let archive = &self.ctx.archive;
        let started = Instant::now();

        let session_id = archive
            .begin_session(account)
            .await
            .map_err(SyncError::transfer)?;
        info!(session = %session_id, "Import session opened");

        archive
            .upload(
                account,
                &session_id,
                &mirrored.package,
                mirrored.content_hash.as_str(),
            )
            .await
            .map_err(SyncError::transfer)?;
        info!(
            file = %mirrored.package.file_name,
            bytes = mirrored.package.size_bytes,
            "Archive uploaded"
        );

        archive
            .process(account, &session_id)
            .await
            .map_err(SyncError::transfer)?;
        let duration_seconds = started.elapsed().as_secs();

        self.ctx
            .state_store
            .save(&mirrored.latest, &mirrored.fingerprint)
            .await
            .map_err(SyncError::state)?;
        info!(
            folder = %mirrored.latest,
            fingerprint = %mirrored.fingerprint.short(),
            "Sync state saved"
        );

        let entry = UploadHistoryEntry::success(
            mirrored.latest.clone(),
            mirrored.content_hash.as_str(),
            duration_seconds,
        );
        if let Err(e) = self.ctx.history.append(&entry).await {
            warn!(error = %format!("{e:#}"), "Failed to append upload history");
        }

        Ok(UploadSummary {
            plan: mirrored.planned,
            latest_folder: mirrored.latest,
            fingerprint: mirrored.fingerprint,
            content_hash: mirrored.content_hash,
            session_id,
            stats: mirrored.stats,
            archive_bytes: mirrored.package.size_bytes,
            duration_seconds,
        })
    }

    // ------------------------------------------------------------------------
    // Mirroring helpers
    // ------------------------------------------------------------------------

    /// Local directory mirroring the remote data root, relative to staging
    fn local_data_dir(&self) -> PathBuf {
        self.options.data_root.segments().collect()
    }

    async fn mirror_companions(&self, stats: &mut TransferStats) -> Result<(), SyncError> {
        if !self.options.include_root_files && self.options.companion_folders.is_empty() {
            return Ok(());
        }

        let root = RemotePath::root();
        let entries = self.ctx.listing.list(&root).await.map_err(SyncError::remote)?;

        if self.options.include_root_files {
            self.mirror_entries(&entries, Path::new(""), stats).await?;
        }

        for name in &self.options.companion_folders {
            if !entries.iter().any(|e| e.is_container && e.name == *name) {
                warn!(folder = %name, "Companion folder not found on device");
                continue;
            }
            let path = root
                .join(name)
                .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))?;
            let listed = self.ctx.listing.list(&path).await.map_err(SyncError::remote)?;
            self.mirror_entries(&listed, Path::new(name), stats).await?;
        }

        Ok(())
    }

    async fn mirror_entries(
        &self,
        entries: &[RemoteEntry],
        local_dir: &Path,
        stats: &mut TransferStats,
    ) -> Result<(), SyncError> {
        for entry in entries.iter().filter(|e| !e.is_container) {
            if !self.options.whitelist.matches(&entry.name) {
                debug!(name = %entry.name, "Skipping file outside whitelist");
                stats.skipped += 1;
                continue;
            }

            let data = self
                .ctx
                .listing
                .fetch(&entry.href)
                .await
                .map_err(SyncError::remote)?;
            let target = local_dir.join(&entry.name);
            self.ctx
                .mirror
                .write_file(&target, &data)
                .await
                .map_err(SyncError::mirror)?;

            debug!(path = %target.display(), bytes = data.len(), "Downloaded");
            stats.files += 1;
            stats.bytes += data.len() as u64;
        }
        Ok(())
    }

    async fn record_failure(&self, err: &SyncError) {
        error!(kind = err.kind(), error = %err, "Sync run failed");
        if let Err(e) = self.ctx.error_log.record(Utc::now(), &err.to_string()).await {
            warn!(error = %format!("{e:#}"), "Failed to write error log");
        }
    }
}
