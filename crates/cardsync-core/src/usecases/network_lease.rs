//! Scoped network profile switch
//!
//! [`NetworkLease`] activates the device profile on acquisition and puts
//! the host back on its home profile when released. The restore is only
//! guaranteed on the explicit [`NetworkLease::release`] and
//! [`NetworkLease::release_with`] paths, which every executor exit goes
//! through.
//!
//! A lease dropped without release (cancelled future, panic) spawns the
//! restore onto the current Tokio runtime as a best effort. That task may
//! never run if the runtime is itself shutting down, as it does when a
//! panic unwinds out of `#[tokio::main]`.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::SyncError;
use crate::ports::INetworkSwitch;

/// Holds the device network profile for the duration of a device phase
pub struct NetworkLease {
    switch: Arc<dyn INetworkSwitch>,
    restore_profile: String,
    released: bool,
}

impl NetworkLease {
    /// Activates `profile`, remembering `restore_profile` for release
    ///
    /// If activation fails the restore profile is still activated before
    /// the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NetworkSwitchFailure`] if `profile` could not
    /// be activated
    pub async fn acquire(
        switch: Arc<dyn INetworkSwitch>,
        profile: &str,
        restore_profile: &str,
    ) -> Result<Self, SyncError> {
        info!(profile, "Switching network profile");
        if let Err(e) = switch.activate(profile).await {
            let err = SyncError::network(e);
            if let Err(restore) = switch.activate(restore_profile).await {
                warn!(
                    profile = restore_profile,
                    error = %format!("{restore:#}"),
                    "Failed to restore network profile"
                );
            }
            return Err(err);
        }

        Ok(Self {
            switch,
            restore_profile: restore_profile.to_string(),
            released: false,
        })
    }

    /// Restores the home profile
    pub async fn release(mut self) -> Result<(), SyncError> {
        self.released = true;
        info!(profile = %self.restore_profile, "Restoring network profile");
        self.switch
            .activate(&self.restore_profile)
            .await
            .map_err(SyncError::network)
    }

    /// Releases the lease and merges the outcome with `result`
    ///
    /// A failed phase keeps its own error and only logs a failed restore.
    /// A successful phase followed by a failed restore reports the restore
    /// failure.
    pub async fn release_with<T>(self, result: Result<T, SyncError>) -> Result<T, SyncError> {
        let released = self.release().await;
        match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(restore)) => Err(restore),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(restore)) => {
                warn!(error = %restore, "Failed to restore network profile after error");
                Err(err)
            }
        }
    }
}

impl Drop for NetworkLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        warn!(
            profile = %self.restore_profile,
            "Network lease dropped without release, restoring in background"
        );
        let switch = Arc::clone(&self.switch);
        let profile = self.restore_profile.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = switch.activate(&profile).await {
                        warn!(profile = %profile, error = %format!("{e:#}"), "Background restore failed");
                    } else {
                        debug!(profile = %profile, "Background restore complete");
                    }
                });
            }
            Err(_) => warn!("No async runtime available to restore network profile"),
        }
    }
}
