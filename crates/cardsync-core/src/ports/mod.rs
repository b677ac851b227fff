//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteListing`] - Device directory listing, metadata probes and downloads
//! - [`INetworkSwitch`] - Host network profile activation
//! - [`IArchiveService`] - Remote archive/ingest service
//! - [`ILocalMirror`] - Local staging mirror and packaging
//! - [`IStateStore`] - Persisted synchronization state
//! - [`IHistoryLog`] / [`IErrorLog`] - Append-only run records
//!
//! ## Design Notes
//!
//! - Ports return `anyhow::Result` because errors at port boundaries are
//!   adapter-specific; use cases classify them into `SyncError`.
//! - Uses `#[async_trait]` for async trait methods.

pub mod archive_service;
pub mod local_mirror;
pub mod network_switch;
pub mod remote_listing;
pub mod run_log;
pub mod state_store;

pub use archive_service::{ArchiveAccount, ArchivePackage, IArchiveService};
pub use local_mirror::ILocalMirror;
pub use network_switch::INetworkSwitch;
pub use remote_listing::{IRemoteListing, RemoteEntry};
pub use run_log::{IErrorLog, IHistoryLog};
pub use state_store::IStateStore;
