//! cardsync Local - host-side adapters
//!
//! - [`mirror::StagingMirror`] - staging directory, zip packaging, content digests
//! - [`network::NmcliSwitch`] - NetworkManager profile switching
//! - [`network::NoopSwitch`] - for hosts that reach the card and the internet at once

pub mod mirror;
pub mod network;

pub use mirror::StagingMirror;
pub use network::{NmcliSwitch, NoopSwitch};
