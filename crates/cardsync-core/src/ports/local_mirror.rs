//! Local mirror port (driven/secondary port)
//!
//! The executor materializes remote files into a staging directory, then
//! packages the whole directory into a single archive. Paths handed to the
//! mirror are relative to the staging root.

use std::path::Path;

use crate::domain::newtypes::Fingerprint;
use crate::ports::archive_service::ArchivePackage;

/// Port trait for the local staging mirror
#[async_trait::async_trait]
pub trait ILocalMirror: Send + Sync {
    /// Removes the previous staging tree and archive, leaving an empty root
    async fn reset(&self) -> anyhow::Result<()>;

    /// Writes one file, creating parent directories as needed
    async fn write_file(&self, relative: &Path, data: &[u8]) -> anyhow::Result<()>;

    /// Packages the staging tree into an archive
    async fn package(&self) -> anyhow::Result<ArchivePackage>;

    /// Digest over the bytes of every file under `relative_dir`, in sorted order
    async fn content_digest(&self, relative_dir: &Path) -> anyhow::Result<Fingerprint>;
}
