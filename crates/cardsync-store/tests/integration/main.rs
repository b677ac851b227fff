//! Integration tests for cardsync-store
//!
//! Drives the sync executor against the file-backed stores, with the
//! device, archive and mirror replaced by in-process doubles.

mod common;
mod test_run_records;
