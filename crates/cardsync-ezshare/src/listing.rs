//! HTML listing parser
//!
//! Turns a folder page into [`RemoteEntry`] values. The link label (trimmed
//! text) is the entry name; the link target is resolved to an absolute URL
//! and kept as the entry's `href`.

use scraper::{Html, Selector};
use url::Url;

use cardsync_core::ports::RemoteEntry;

use crate::{EzShareError, Result};

/// Marker present in the href of every downloadable file
pub const DOWNLOAD_MARKER: &str = "download?file=";

/// Resolves a listing href against the card's base URL
///
/// Absolute `http(s)` links are kept as is. Anything else is appended to the
/// base URL with leading slashes removed.
pub fn resolve_href(base: &Url, href: &str) -> Result<Url> {
    let href = href.trim();
    if href.to_ascii_lowercase().starts_with("http") {
        return Url::parse(href).map_err(|e| EzShareError::InvalidUrl(format!("{href}: {e}")));
    }
    base.join(href.trim_start_matches('/'))
        .map_err(|e| EzShareError::InvalidUrl(format!("{href}: {e}")))
}

/// Parses a folder page into entries, in document order
///
/// Links without text are skipped. Links whose target contains
/// [`DOWNLOAD_MARKER`] are files; every other link is a container.
pub fn parse_listing(html: &str, base: &Url) -> Result<Vec<RemoteEntry>> {
    let selector = Selector::parse("a[href]")
        .map_err(|e| EzShareError::InvalidListing(format!("selector: {e}")))?;
    let document = Html::parse_document(html);

    let mut entries = Vec::new();
    for link in document.select(&selector) {
        let name = link.text().collect::<String>().trim().to_string();
        if name.is_empty() {
            continue;
        }
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let url = resolve_href(base, href)?;
        let entry = if href.contains(DOWNLOAD_MARKER) {
            RemoteEntry::file(name, url.as_str())
        } else {
            RemoteEntry::folder(name, url.as_str())
        };
        entries.push(entry);
    }

    Ok(entries)
}
