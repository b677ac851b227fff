//! Change detection use case
//!
//! Computes a metadata-only fingerprint of a remote date folder and compares
//! it against the fingerprint recorded at the last successful sync. Only
//! names and probed sizes are used, so a same-size content edit on the
//! device goes unnoticed; the trade-off is that no file body is downloaded.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::{
    domain::{DateFolder, FileEntry, Fingerprint, RemotePath, SyncError, SyncState, Whitelist},
    ports::IRemoteListing,
};

/// Fingerprints remote date folders through the listing port
pub struct ChangeDetector {
    listing: Arc<dyn IRemoteListing>,
    whitelist: Whitelist,
    data_root: RemotePath,
}

impl ChangeDetector {
    /// Creates a new ChangeDetector
    ///
    /// # Arguments
    ///
    /// * `listing` - Device listing used for folder enumeration and size probes
    /// * `whitelist` - Extensions that participate in the fingerprint
    /// * `data_root` - Folder holding the date folders (e.g. `/DATALOG`)
    pub fn new(
        listing: Arc<dyn IRemoteListing>,
        whitelist: Whitelist,
        data_root: RemotePath,
    ) -> Self {
        Self {
            listing,
            whitelist,
            data_root,
        }
    }

    /// Logical path of a date folder under the data root
    pub fn folder_path(&self, folder: &DateFolder) -> Result<RemotePath, SyncError> {
        self.data_root
            .join(folder.as_str())
            .map_err(|e| SyncError::RemoteUnavailable(e.to_string()))
    }

    /// Lists a date folder and probes the size of every whitelisted file
    ///
    /// Entries come back in listing order. Probes are issued one at a time
    /// and the first failure aborts the whole inspection.
    pub async fn inspect_folder(&self, folder: &DateFolder) -> Result<Vec<FileEntry>, SyncError> {
        let path = self.folder_path(folder)?;
        let entries = self.listing.list(&path).await.map_err(SyncError::remote)?;

        let mut inspected = Vec::new();
        for entry in entries {
            if entry.is_container || !self.whitelist.matches(&entry.name) {
                continue;
            }

            debug!(name = %entry.name, href = %entry.href, "Probing size");
            let size = self
                .listing
                .probe_size(&entry.href)
                .await
                .map_err(SyncError::remote)?;
            inspected.push(FileEntry::new(entry.name, size, &self.whitelist));
        }

        Ok(inspected)
    }

    /// Computes the remote fingerprint of `folder`
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::RemoteUnavailable`] if the listing or any size
    /// probe fails
    pub async fn compute_fingerprint(&self, folder: &DateFolder) -> Result<Fingerprint, SyncError> {
        let entries = self.inspect_folder(folder).await?;
        let fingerprint = Self::fingerprint_entries(&entries);
        info!(
            folder = %folder,
            files = entries.len(),
            fingerprint = %fingerprint.short(),
            "Computed remote fingerprint"
        );
        Ok(fingerprint)
    }

    /// SHA-256 over `"<name>:<size>\n"` of each whitelisted entry, in order
    pub fn fingerprint_entries(entries: &[FileEntry]) -> Fingerprint {
        let mut hasher = Sha256::new();
        for entry in entries.iter().filter(|e| e.is_whitelisted) {
            hasher.update(entry.fingerprint_line().as_bytes());
        }
        Fingerprint::from_digest(&hasher.finalize())
    }

    /// Returns true if the two fingerprints differ
    pub fn has_changed(current: &Fingerprint, previous: &Fingerprint) -> bool {
        current != previous
    }

    /// Checks whether the last synchronized folder was mutated in place
    ///
    /// Returns `false` without any remote call when there is no recorded
    /// folder, no recorded fingerprint, or the folder no longer exists on
    /// the device.
    pub async fn last_folder_changed(
        &self,
        remote_folders: &[DateFolder],
        state: &SyncState,
    ) -> Result<bool, SyncError> {
        let (Some(last), Some(previous)) = (&state.last_folder, &state.last_fingerprint) else {
            return Ok(false);
        };

        if !remote_folders.contains(last) {
            debug!(folder = %last, "Last synchronized folder no longer on device");
            return Ok(false);
        }

        let current = self.compute_fingerprint(last).await?;
        let changed = Self::has_changed(&current, previous);
        if changed {
            info!(
                folder = %last,
                previous = %previous.short(),
                current = %current.short(),
                "Change detected in last synchronized folder"
            );
        } else {
            info!(folder = %last, "No change in last synchronized folder");
        }
        Ok(changed)
    }
}
