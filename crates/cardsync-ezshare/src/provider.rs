//! [`IRemoteListing`] implementation for the ez Share card
//!
//! The card has no path-addressed API: a folder page is reached by
//! following link labels from the root page, one level at a time. Listing
//! `/DATALOG/20250501` therefore costs three page loads.

use anyhow::Context;
use tracing::{debug, info};
use url::Url;

use cardsync_core::{
    domain::RemotePath,
    ports::{IRemoteListing, RemoteEntry},
};

use crate::{
    client::EzShareClient,
    listing::parse_listing,
    EzShareError, Result,
};

/// Remote listing backed by the card's HTML pages
#[derive(Debug, Clone)]
pub struct EzShareListing {
    client: EzShareClient,
}

impl EzShareListing {
    /// Creates a new listing over `client`
    pub fn new(client: EzShareClient) -> Self {
        Self { client }
    }

    async fn load(&self, url: &Url) -> Result<Vec<RemoteEntry>> {
        let html = self.client.get_page(url).await?;
        parse_listing(&html, self.client.base_url())
    }

    /// Walks link labels from the root page down to `path`
    async fn list_folder(&self, path: &RemotePath) -> Result<Vec<RemoteEntry>> {
        let mut entries = self.load(&self.client.root_url()?).await?;
        let mut current = String::from("/");

        for segment in path.segments() {
            let folder = entries
                .iter()
                .find(|e| e.is_container && e.name == segment)
                .ok_or_else(|| EzShareError::FolderNotFound {
                    name: segment.to_string(),
                    parent: current.clone(),
                })?;
            let url = Url::parse(&folder.href)
                .map_err(|e| EzShareError::InvalidUrl(format!("{}: {e}", folder.href)))?;

            debug!(folder = segment, url = %url, "Descending into folder");
            entries = self.load(&url).await?;
            if !current.ends_with('/') {
                current.push('/');
            }
            current.push_str(segment);
        }

        Ok(entries)
    }
}

#[async_trait::async_trait]
impl IRemoteListing for EzShareListing {
    async fn list(&self, path: &RemotePath) -> anyhow::Result<Vec<RemoteEntry>> {
        let entries = self
            .list_folder(path)
            .await
            .with_context(|| format!("Failed to list {path}"))?;
        info!(path = %path, entries = entries.len(), "Listed folder");
        Ok(entries)
    }

    async fn probe_size(&self, href: &str) -> anyhow::Result<u64> {
        let size = self
            .client
            .head_size(href)
            .await
            .with_context(|| format!("Failed to probe {href}"))?;
        debug!(href, size, "Probed size");
        Ok(size)
    }

    async fn fetch(&self, href: &str) -> anyhow::Result<Vec<u8>> {
        self.client
            .download(href)
            .await
            .with_context(|| format!("Failed to download {href}"))
    }
}
