//! Credentials file
//!
//! A JSON object with the OAuth client and the account login:
//!
//! ```json
//! {"client_id": "...", "client_secret": "...", "username": "...", "password": "..."}
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::{ArchiveError, Result};

/// OAuth client and account credentials for the password grant
#[derive(Clone, Deserialize)]
pub struct ArchiveCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for ArchiveCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ArchiveCredentials {
    /// Reads credentials from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ArchiveError::Credentials(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| ArchiveError::Credentials(format!("{}: {e}", path.display())))
    }
}
