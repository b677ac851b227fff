//! Network switch port (driven/secondary port)
//!
//! The device is only reachable on its own access point, so the host has to
//! move its network attachment to the device profile before listing and
//! back to the home profile afterwards.

/// Port trait for activating a host network profile
#[async_trait::async_trait]
pub trait INetworkSwitch: Send + Sync {
    /// Activates `profile`, blocking until the connection is usable
    ///
    /// # Errors
    /// Returns an error if the profile could not be brought up
    async fn activate(&self, profile: &str) -> anyhow::Result<()>;
}
