//! cardsync Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `DateFolder`, `Fingerprint`, `SyncState`, `SyncPlan`, `UploadHistoryEntry`
//! - **Use cases** - `ChangeDetector`, `SyncPlanner`, `SyncExecutor`
//! - **Port definitions** - Traits for adapters: `IRemoteListing`, `INetworkSwitch`,
//!   `IArchiveService`, `ILocalMirror`, `IStateStore`, `IHistoryLog`, `IErrorLog`
//!
//! # Architecture
//!
//! The domain module contains pure types with no I/O. Ports define trait
//! interfaces that adapter crates implement. Use cases orchestrate domain
//! types through port interfaces, one network call at a time.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
