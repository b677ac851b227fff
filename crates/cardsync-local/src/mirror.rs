//! Staging mirror adapter (secondary/driven adapter)
//!
//! Implements [`ILocalMirror`] on a staging directory.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: Each file is written to `<name>.tmp` and renamed.
//! - **Contained paths**: Relative paths must consist of plain components;
//!   a listing label can never write outside the staging directory.
//! - **Archive names**: Zip entries use `/` separators and a lower-cased
//!   extension (`BRP.EDF` becomes `BRP.edf`), as the importer expects.
//! - **Blocking work**: Directory walks, zipping and hashing run on the
//!   blocking pool.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use cardsync_core::{
    domain::Fingerprint,
    ports::{ArchivePackage, ILocalMirror},
};

/// Staging directory plus the archive built from it
#[derive(Debug, Clone)]
pub struct StagingMirror {
    staging_dir: PathBuf,
    archive_path: PathBuf,
}

impl StagingMirror {
    /// Creates a new StagingMirror
    ///
    /// # Arguments
    /// * `staging_dir` - Directory receiving the mirrored files
    /// * `archive_path` - Zip file written by [`ILocalMirror::package`]
    pub fn new(staging_dir: PathBuf, archive_path: PathBuf) -> Self {
        Self {
            staging_dir,
            archive_path,
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    fn resolve(&self, relative: &Path) -> anyhow::Result<PathBuf> {
        if relative.as_os_str().is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            bail!("refusing to write outside staging: {}", relative.display());
        }
        Ok(self.staging_dir.join(relative))
    }
}

/// Zip entry name for a staging-relative path
pub fn archive_entry_name(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let Some((last, dirs)) = parts.split_last() else {
        return String::new();
    };

    let file = match last.rfind('.') {
        Some(dot) if dot > 0 => format!("{}{}", &last[..dot], last[dot..].to_lowercase()),
        _ => last.clone(),
    };

    let mut name = dirs.join("/");
    if !name.is_empty() {
        name.push('/');
    }
    name.push_str(&file);
    name
}

/// Every regular file under `root`, sorted by path
fn collect_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else if file_type.is_file() {
                files.push(entry.path());
            }
        }
    }
    files.sort();
    Ok(files)
}

fn write_zip(staging: &Path, archive: &Path) -> anyhow::Result<u64> {
    let files = collect_files(staging)
        .with_context(|| format!("Failed to walk {}", staging.display()))?;

    let tmp_path = {
        let mut p = archive.as_os_str().to_owned();
        p.push(".tmp");
        PathBuf::from(p)
    };
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(File::create(&tmp_path)?);

    for path in &files {
        let relative = path.strip_prefix(staging)?;
        let name = archive_entry_name(relative);
        debug!(file = %relative.display(), entry = %name, "Adding to archive");
        writer.start_file(name, options)?;
        let data = std::fs::read(path)?;
        writer.write_all(&data)?;
    }
    writer.finish()?;

    std::fs::rename(&tmp_path, archive)?;
    Ok(std::fs::metadata(archive)?.len())
}

fn digest_dir(dir: &Path) -> anyhow::Result<Fingerprint> {
    let mut hasher = Sha256::new();
    let files = match collect_files(dir) {
        Ok(files) => files,
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e).with_context(|| format!("Failed to walk {}", dir.display())),
    };

    let mut buf = [0u8; 8192];
    for path in files {
        let mut file = File::open(&path)?;
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
    }
    Ok(Fingerprint::from_digest(&hasher.finalize()))
}

#[async_trait::async_trait]
impl ILocalMirror for StagingMirror {
    #[instrument(skip(self), fields(staging = %self.staging_dir.display()))]
    async fn reset(&self) -> anyhow::Result<()> {
        match tokio::fs::remove_dir_all(&self.staging_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).context("Failed to remove staging directory"),
        }
        match tokio::fs::remove_file(&self.archive_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e).context("Failed to remove previous archive"),
        }
        tokio::fs::create_dir_all(&self.staging_dir).await?;
        info!("Cleaned previous downloads");
        Ok(())
    }

    #[instrument(skip(self, data), fields(path = %relative.display(), bytes = data.len()))]
    async fn write_file(&self, relative: &Path, data: &[u8]) -> anyhow::Result<()> {
        let target = self.resolve(relative)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = {
            let mut p = target.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &target).await?;
        Ok(())
    }

    async fn package(&self) -> anyhow::Result<ArchivePackage> {
        let staging = self.staging_dir.clone();
        let archive = self.archive_path.clone();
        if let Some(parent) = archive.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let size_bytes = tokio::task::spawn_blocking(move || write_zip(&staging, &archive))
            .await?
            .context("Failed to create archive")?;

        let file_name = self
            .archive_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.zip".to_string());
        info!(archive = %self.archive_path.display(), bytes = size_bytes, "Archive created");

        Ok(ArchivePackage {
            path: self.archive_path.clone(),
            file_name,
            size_bytes,
        })
    }

    async fn content_digest(&self, relative_dir: &Path) -> anyhow::Result<Fingerprint> {
        let dir = self.resolve(relative_dir)?;
        let digest = tokio::task::spawn_blocking(move || digest_dir(&dir)).await??;
        debug!(dir = %relative_dir.display(), digest = %digest.short(), "Content digest");
        Ok(digest)
    }
}
