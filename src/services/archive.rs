//! Snapshot archiving: bundles a backup directory into a single
//! zstd-compressed tar file.
//!
//! tar and zstd are synchronous, so both directions run on the blocking
//! pool. Compression reports success only after the encoder is finished and
//! the archive file is synced; on any failure the partial archive is removed
//! and the source directory is left untouched.

use crate::error::{BackupError, Result};
use std::fs::File;
use std::path::Path;

/// Extension of compressed backups under the backup root.
pub const ARCHIVE_EXT: &str = "tar.zst";

const ARCHIVE_SUFFIX: &str = ".tar.zst";

/// Whether a path names a compressed backup produced by [`compress`].
pub fn is_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.ends_with(ARCHIVE_SUFFIX))
        .unwrap_or(false)
}

/// File name with the archive extension stripped.
pub fn archive_stem(file_name: &str) -> &str {
    file_name.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(file_name)
}

/// Compress every file under `source_dir` into a single archive at `target`.
///
/// Entry paths are relative to `source_dir`; the directory name itself is
/// not part of the archive.
pub async fn compress(source_dir: &Path, target: &Path) -> Result<()> {
    let source_dir = source_dir.to_path_buf();
    let target = target.to_path_buf();

    tokio::task::spawn_blocking(move || {
        if let Err(e) = write_archive(&source_dir, &target) {
            let _ = std::fs::remove_file(&target);
            return Err(BackupError::Archive(format!(
                "failed to compress {}: {e}",
                source_dir.display()
            )));
        }
        Ok(())
    })
    .await
    .map_err(|e| BackupError::Archive(e.to_string()))?
}

/// Expand an archive produced by [`compress`] into `target_dir`.
pub async fn expand(archive: &Path, target_dir: &Path) -> Result<()> {
    let archive = archive.to_path_buf();
    let target_dir = target_dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        read_archive(&archive, &target_dir).map_err(|e| {
            BackupError::Archive(format!("failed to expand {}: {e}", archive.display()))
        })
    })
    .await
    .map_err(|e| BackupError::Archive(e.to_string()))?
}

fn write_archive(source_dir: &Path, target: &Path) -> anyhow::Result<()> {
    let file = File::create(target)?;
    let level = *zstd::compression_level_range().end();
    let encoder = zstd::stream::Encoder::new(file, level)?;

    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all(".", source_dir)?;

    // Completion is the stream fully closing, not entries being queued.
    let encoder = builder.into_inner()?;
    let file = encoder.finish()?;
    file.sync_all()?;
    Ok(())
}

fn read_archive(archive: &Path, target_dir: &Path) -> anyhow::Result<()> {
    let file = File::open(archive)?;
    let decoder = zstd::stream::Decoder::new(file)?;
    let mut archive = tar::Archive::new(decoder);
    archive.unpack(target_dir)?;
    Ok(())
}
