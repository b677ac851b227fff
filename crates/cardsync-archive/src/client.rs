//! SleepHQ HTTP client
//!
//! Endpoints used:
//!
//! | step | request |
//! |---|---|
//! | token | `POST /oauth/token` (password grant, scope `read write`) |
//! | team | `GET /api/v1/teams` |
//! | session | `POST /api/v1/teams/{team}/imports` |
//! | upload | `POST /api/v1/imports/{import}/files` (multipart) |
//! | process | `POST /api/v1/imports/{import}/process_files` |

use std::path::Path;
use std::time::Duration;

use reqwest::{header::ACCEPT, multipart, Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{credentials::ArchiveCredentials, ArchiveError, Result};

/// Production base URL
pub const DEFAULT_BASE_URL: &str = "https://sleephq.com";

/// Media type the import endpoints answer with
const JSON_API: &str = "application/vnd.api+json";

/// Longest response body kept in error messages
const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// `{"data": ...}` envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Resource {
    id: Value,
    #[serde(default)]
    attributes: Option<Value>,
}

impl Resource {
    /// Ids come back as strings or numbers depending on the endpoint
    fn id_string(&self) -> Result<String> {
        match &self.id {
            Value::String(s) if !s.is_empty() => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(ArchiveError::InvalidResponse(format!(
                "unexpected id: {other}"
            ))),
        }
    }
}

/// HTTP client for the SleepHQ API
#[derive(Debug, Clone)]
pub struct SleepHqClient {
    client: Client,
    base_url: String,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl SleepHqClient {
    /// Creates a client against `base_url`
    ///
    /// # Arguments
    /// * `base_url` - API host, e.g. [`DEFAULT_BASE_URL`] (or a mock server in tests)
    /// * `request_timeout` - Timeout for every call except the upload
    /// * `upload_timeout` - Timeout for the archive upload
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout,
            upload_timeout,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchanges the account credentials for an access token
    pub async fn request_token(&self, credentials: &ArchiveCredentials) -> Result<String> {
        debug!(username = %credentials.username, "Requesting access token");
        let params = [
            ("grant_type", "password"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("scope", "read write"),
        ];

        let response = self
            .client
            .post(self.url("/oauth/token"))
            .form(&params)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let token: TokenResponse = parse_json(check_status("token request", response).await?).await?;

        info!("Access token retrieved");
        Ok(token.access_token)
    }

    /// Returns the id of the account's first team
    pub async fn first_team(&self, token: &str) -> Result<String> {
        let response = self
            .client
            .get(self.url("/api/v1/teams"))
            .bearer_auth(token)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let teams: Envelope<Vec<Resource>> =
            parse_json(check_status("team lookup", response).await?).await?;

        let team = teams.data.first().ok_or(ArchiveError::NoTeam)?;
        let id = team.id_string()?;
        let name = team
            .attributes
            .as_ref()
            .and_then(|a| a.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("?");
        info!(team_id = %id, team = name, "Using team");
        Ok(id)
    }

    /// Opens an import session for `team_id`
    pub async fn create_import(&self, token: &str, team_id: &str) -> Result<String> {
        let response = self
            .client
            .post(self.url(&format!("/api/v1/teams/{team_id}/imports")))
            .bearer_auth(token)
            .header(ACCEPT, JSON_API)
            .json(&serde_json::json!({ "programatic": false }))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let import: Envelope<Resource> =
            parse_json(check_status("import creation", response).await?).await?;

        let id = import.data.id_string()?;
        info!(import_id = %id, "Import session created");
        Ok(id)
    }

    /// Uploads the archive at `path` into the import session
    pub async fn upload_file(
        &self,
        token: &str,
        import_id: &str,
        path: &Path,
        file_name: &str,
        content_hash: &str,
    ) -> Result<()> {
        let data = tokio::fs::read(path).await?;
        let size = data.len();
        let part = multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("application/zip")?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("name", file_name.to_string())
            .text("path", "/")
            .text("content_hash", content_hash.to_string());

        let response = self
            .client
            .post(self.url(&format!("/api/v1/imports/{import_id}/files")))
            .bearer_auth(token)
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await?;
        check_status("upload", response).await?;

        info!(import_id, file = file_name, bytes = size, "File uploaded");
        Ok(())
    }

    /// Asks the service to process the uploaded files
    pub async fn process_import(&self, token: &str, import_id: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url(&format!("/api/v1/imports/{import_id}/process_files")))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .send()
            .await?;
        check_status("import processing", response).await?;

        info!(import_id, "Import processing started");
        Ok(())
    }
}

async fn check_status(operation: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    Err(ArchiveError::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}

async fn parse_json<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ArchiveError::InvalidResponse(e.to_string()))
}
