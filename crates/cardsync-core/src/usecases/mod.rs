//! Use cases
//!
//! Application logic built on the port traits:
//!
//! - [`ChangeDetector`] - Remote folder fingerprints
//! - [`SyncPlanner`] - Decides what a run transfers
//! - [`SyncExecutor`] - Mirrors, uploads and advances the state
//! - [`NetworkLease`] - Scoped switch to the device network

pub mod detect_change;
pub mod network_lease;
pub mod plan_sync;
pub mod run_sync;

#[cfg(test)]
pub(crate) mod testing;

pub use detect_change::ChangeDetector;
pub use network_lease::NetworkLease;
pub use plan_sync::SyncPlanner;
pub use run_sync::{
    FolderFingerprint, PlanPreview, RunOutcome, SyncContext, SyncExecutor, SyncOptions,
    TransferStats, UploadSummary,
};
