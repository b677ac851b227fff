//! Remote file entries and the extension whitelist

use serde::{Deserialize, Serialize};

/// Extensions accepted by default (therapy data, checksums, settings and logs)
pub const DEFAULT_EXTENSIONS: &[&str] = &[".edf", ".crc", ".json", ".tgt", ".log"];

/// Fixed set of accepted file extensions
///
/// Matching is a case-insensitive suffix test on the file name, so
/// `BRP.EDF` and `brp.edf` are both accepted by `.edf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Whitelist {
    extensions: Vec<String>,
}

impl Whitelist {
    /// Creates a whitelist from extension suffixes (leading dot optional)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim().to_ascii_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();
        Self { extensions }
    }

    /// Returns true if `name` ends with one of the accepted extensions
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext.as_str()))
    }

    /// Accepted extensions, lower-cased with a leading dot
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Returns true if no extension is accepted
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl Default for Whitelist {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

/// A file discovered in a remote folder, with its probed size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name as shown in the listing
    pub name: String,
    /// Size in bytes as reported by the metadata probe
    pub size: u64,
    /// Whether the name passed the whitelist
    pub is_whitelisted: bool,
}

impl FileEntry {
    /// Creates an entry, evaluating the whitelist
    pub fn new(name: impl Into<String>, size: u64, whitelist: &Whitelist) -> Self {
        let name = name.into();
        let is_whitelisted = whitelist.matches(&name);
        Self {
            name,
            size,
            is_whitelisted,
        }
    }

    /// The `"<name>:<size>\n"` line this entry contributes to a fingerprint
    pub fn fingerprint_line(&self) -> String {
        format!("{}:{}\n", self.name, self.size)
    }
}
