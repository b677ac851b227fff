//! Integration tests for cardsync-ezshare
//!
//! Uses wiremock to serve ez Share listing pages and verifies folder
//! navigation, size probes and downloads through the `IRemoteListing` port.

mod common;

mod test_fetch;
mod test_listing;
