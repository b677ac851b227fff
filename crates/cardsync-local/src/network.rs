//! Network profile switching
//!
//! The card runs its own access point, so on a single-radio host reaching
//! it means leaving the home network. [`NmcliSwitch`] activates
//! NetworkManager connection profiles and then waits for DHCP and routes to
//! settle.

use std::time::Duration;

use anyhow::bail;
use tokio::process::Command;
use tracing::{debug, info, instrument};

use cardsync_core::ports::INetworkSwitch;

/// Switches profiles with `nmcli connection up <profile>`
#[derive(Debug, Clone)]
pub struct NmcliSwitch {
    program: String,
    settle_delay: Duration,
}

impl NmcliSwitch {
    pub fn new(settle_delay: Duration) -> Self {
        Self::with_program("nmcli", settle_delay)
    }

    /// Uses a different executable taking the same arguments
    pub fn with_program(program: impl Into<String>, settle_delay: Duration) -> Self {
        Self {
            program: program.into(),
            settle_delay,
        }
    }
}

#[async_trait::async_trait]
impl INetworkSwitch for NmcliSwitch {
    #[instrument(skip(self), fields(program = %self.program))]
    async fn activate(&self, profile: &str) -> anyhow::Result<()> {
        let output = Command::new(&self.program)
            .args(["connection", "up", profile])
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} connection up {} failed ({}): {}",
                self.program,
                profile,
                output.status,
                stderr.trim()
            );
        }

        info!(profile, "Network profile active");
        if !self.settle_delay.is_zero() {
            debug!(delay_secs = self.settle_delay.as_secs(), "Waiting for network to settle");
            tokio::time::sleep(self.settle_delay).await;
        }
        Ok(())
    }
}

/// Leaves the network alone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSwitch;

#[async_trait::async_trait]
impl INetworkSwitch for NoopSwitch {
    async fn activate(&self, profile: &str) -> anyhow::Result<()> {
        debug!(profile, "Network switching disabled");
        Ok(())
    }
}
