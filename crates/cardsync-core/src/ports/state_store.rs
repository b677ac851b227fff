//! State store port (driven/secondary port)

use crate::domain::newtypes::{DateFolder, Fingerprint};
use crate::domain::state::SyncState;

/// Port trait for the persisted synchronization state
///
/// There is no locking: at most one process is assumed to use the store at
/// any time.
#[async_trait::async_trait]
pub trait IStateStore: Send + Sync {
    /// Loads the state, returning [`SyncState::default`] if none was saved yet
    async fn load(&self) -> anyhow::Result<SyncState>;

    /// Atomically replaces the whole record
    ///
    /// Must only be called after a transfer was confirmed.
    async fn save(&self, folder: &DateFolder, fingerprint: &Fingerprint) -> anyhow::Result<()>;
}
