//! Sync planning use case
//!
//! Decides, from the remote date folders, the persisted state and an
//! optional start-date override, whether this run has to transfer anything
//! and which contiguous range of folders to fetch.
//!
//! ## Decision Rules
//!
//! 1. No remote date folders: nothing to do.
//! 2. New folders are those strictly newer than the last synchronized one
//!    (every folder on the first run), or those `>= override` when a start
//!    date is given.
//! 3. Without an override, the last synchronized folder is re-fingerprinted
//!    when it still exists on the device and a fingerprint was recorded.
//! 4. No new folders and no forced re-download: nothing to do. This check
//!    happens before any download or transfer.
//! 5. Otherwise the start is the override, else the last synchronized folder
//!    if it changed, else the oldest new folder. Every remote folder at or
//!    after the start is fetched.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    domain::{
        DateFolder, PlanTrigger, PlannedSync, RemotePath, SyncError, SyncPlan, SyncState,
        Whitelist,
    },
    ports::IRemoteListing,
    usecases::detect_change::ChangeDetector,
};

/// Plans synchronization runs against the device
pub struct SyncPlanner {
    listing: Arc<dyn IRemoteListing>,
    data_root: RemotePath,
    detector: ChangeDetector,
}

impl SyncPlanner {
    /// Creates a new SyncPlanner
    ///
    /// # Arguments
    ///
    /// * `listing` - Device listing
    /// * `whitelist` - Extensions that participate in fingerprints
    /// * `data_root` - Folder holding the date folders
    pub fn new(
        listing: Arc<dyn IRemoteListing>,
        whitelist: Whitelist,
        data_root: RemotePath,
    ) -> Self {
        let detector = ChangeDetector::new(Arc::clone(&listing), whitelist, data_root.clone());
        Self {
            listing,
            data_root,
            detector,
        }
    }

    /// The change detector used for last-folder fingerprints
    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    /// Lists the data root and returns its date folders, ascending
    ///
    /// Entries that are not 8-digit folders are ignored.
    pub async fn discover_date_folders(&self) -> Result<Vec<DateFolder>, SyncError> {
        let entries = self
            .listing
            .list(&self.data_root)
            .await
            .map_err(SyncError::remote)?;

        let folders: BTreeSet<DateFolder> = entries
            .into_iter()
            .filter(|e| e.is_container)
            .filter_map(|e| DateFolder::new(e.name).ok())
            .collect();

        debug!(
            root = %self.data_root,
            count = folders.len(),
            "Discovered date folders"
        );
        Ok(folders.into_iter().collect())
    }

    /// Produces the plan for this run
    ///
    /// Performs remote metadata probes only when the last synchronized
    /// folder needs to be re-fingerprinted. An override bypasses the
    /// fingerprint check entirely.
    pub async fn plan(
        &self,
        remote_folders: &[DateFolder],
        state: &SyncState,
        override_start: Option<&DateFolder>,
    ) -> Result<SyncPlan, SyncError> {
        if remote_folders.is_empty() {
            info!("No date folders on device");
            return Ok(SyncPlan::NoOp);
        }

        let last_folder_changed = match override_start {
            Some(start) => {
                info!(start = %start, "Start date override in effect");
                false
            }
            None => self.detector.last_folder_changed(remote_folders, state).await?,
        };

        let plan = Self::decide(remote_folders, state, override_start, last_folder_changed);
        match &plan {
            SyncPlan::NoOp => info!("No new data and no changes detected"),
            SyncPlan::Execute(planned) => info!(
                trigger = %planned.trigger,
                start = %planned.start_folder,
                folders = planned.folders_to_fetch.len(),
                forced = planned.forced_redownload_of_last,
                "Planned transfer"
            ),
        }
        Ok(plan)
    }

    /// Pure decision step
    ///
    /// `remote_folders` need not be sorted. `last_folder_changed` is the
    /// outcome of the fingerprint comparison and is ignored when an
    /// override is given.
    pub fn decide(
        remote_folders: &[DateFolder],
        state: &SyncState,
        override_start: Option<&DateFolder>,
        last_folder_changed: bool,
    ) -> SyncPlan {
        let remote: BTreeSet<&DateFolder> = remote_folders.iter().collect();
        if remote.is_empty() {
            return SyncPlan::NoOp;
        }

        let new_folders: Vec<&DateFolder> = remote
            .iter()
            .copied()
            .filter(|folder| match (override_start, &state.last_folder) {
                (Some(start), _) => *folder >= start,
                (None, Some(last)) => *folder > last,
                (None, None) => true,
            })
            .collect();

        let last_changed = override_start.is_none()
            && last_folder_changed
            && state.last_folder.is_some();
        let forced = override_start.is_some() || last_changed;

        if new_folders.is_empty() && !forced {
            return SyncPlan::NoOp;
        }

        let (start_folder, trigger) = match (override_start, &state.last_folder) {
            (Some(start), _) => (start.clone(), PlanTrigger::Override),
            (None, Some(last)) if last_changed => (last.clone(), PlanTrigger::LastFolderChanged),
            _ => match new_folders.first() {
                Some(first) if state.is_initial() => ((*first).clone(), PlanTrigger::InitialSync),
                Some(first) => ((*first).clone(), PlanTrigger::NewFolders),
                None => return SyncPlan::NoOp,
            },
        };

        let folders_to_fetch = remote
            .into_iter()
            .filter(|folder| **folder >= start_folder)
            .cloned()
            .collect();

        SyncPlan::Execute(PlannedSync {
            start_folder,
            folders_to_fetch,
            forced_redownload_of_last: forced,
            trigger,
        })
    }
}
