//! Domain entities and business logic
//!
//! This module contains the core domain types for cardsync:
//! - Newtypes for validated identifiers (`DateFolder`, `Fingerprint`, `RemotePath`)
//! - Remote file entries and the extension whitelist
//! - The persisted synchronization state
//! - Synchronization plans
//! - Upload history records
//! - Domain and run error types

pub mod entry;
pub mod errors;
pub mod history;
pub mod newtypes;
pub mod plan;
pub mod state;

// Re-export commonly used types
pub use entry::{FileEntry, Whitelist, DEFAULT_EXTENSIONS};
pub use errors::{DomainError, SyncError};
pub use history::{UploadHistoryEntry, UploadStatus};
pub use newtypes::*;
pub use plan::{PlanTrigger, PlannedSync, SyncPlan};
pub use state::SyncState;
