//! ez Share HTTP client
//!
//! Thin wrapper over `reqwest::Client` that applies the card's timeouts and
//! turns non-success statuses into [`EzShareError::Status`].

use std::time::Duration;

use reqwest::{header::CONTENT_LENGTH, Client, Response};
use tracing::debug;
use url::Url;

use crate::{EzShareError, Result};

/// Default base URL of the card's access point
pub const DEFAULT_BASE_URL: &str = "http://192.168.4.1";

/// Path of the root listing page
const ROOT_PAGE: &str = "dir";

/// HTTP client for the ez Share card
#[derive(Debug, Clone)]
pub struct EzShareClient {
    client: Client,
    base_url: Url,
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl EzShareClient {
    /// Creates a client for the card at `base_url`
    ///
    /// # Arguments
    /// * `base_url` - Card address, e.g. `http://192.168.4.1`
    /// * `request_timeout` - Timeout for listing pages and downloads
    /// * `probe_timeout` - Timeout for HEAD size probes
    pub fn new(base_url: &str, request_timeout: Duration, probe_timeout: Duration) -> Result<Self> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| EzShareError::InvalidUrl(format!("{base}: {e}")))?;

        Ok(Self {
            client: Client::new(),
            base_url,
            request_timeout,
            probe_timeout,
        })
    }

    /// Base URL, always ending with `/`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of the root listing page
    pub fn root_url(&self) -> Result<Url> {
        self.base_url
            .join(ROOT_PAGE)
            .map_err(|e| EzShareError::InvalidUrl(e.to_string()))
    }

    /// Fetches a listing page as text
    pub async fn get_page(&self, url: &Url) -> Result<String> {
        debug!(url = %url, "GET listing");
        let response = self
            .client
            .get(url.clone())
            .timeout(self.request_timeout)
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.text().await?)
    }

    /// Reads a file's size from the `Content-Length` of a HEAD response
    ///
    /// A missing header reads as 0.
    pub async fn head_size(&self, url: &str) -> Result<u64> {
        debug!(url, "HEAD");
        let response = self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await?;
        let response = check_status(response)?;

        let Some(value) = response.headers().get(CONTENT_LENGTH) else {
            return Ok(0);
        };
        let value = value.to_str().unwrap_or_default().trim();
        value
            .parse::<u64>()
            .map_err(|_| EzShareError::InvalidContentLength {
                url: url.to_string(),
                value: value.to_string(),
            })
    }

    /// Downloads a file body
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "GET file");
        let response = self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let response = check_status(response)?;
        let bytes = response.bytes().await?;
        debug!(url, bytes = bytes.len(), "Downloaded");
        Ok(bytes.to_vec())
    }
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(EzShareError::Status {
            url: response.url().to_string(),
            status: status.as_u16(),
        })
    }
}
