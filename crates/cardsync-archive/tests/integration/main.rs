//! Integration tests for cardsync-archive
//!
//! Uses wiremock to simulate the SleepHQ API and verifies the full
//! connect / session / upload / process exchange through the port.


mod test_auth;
mod test_import;
