//! Subcommand implementations

pub mod config;
pub mod errors;
pub mod fingerprint;
pub mod history;
pub mod run;
pub mod state;
