//! On-disk backup inventory.
//!
//! The filesystem is the source of truth: every call rescans the backup
//! root and rebuilds descriptors from scratch. Backup counts are small
//! enough that recomputing beats keeping an index consistent.

use crate::error::Result;
use crate::models::{BackupDescriptor, BackupManifest, MANIFEST_FILE};
use crate::services::archive;
use crate::state::EngineState;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::debug;

/// Enumerate all backups under the backup root, newest first.
///
/// Directory entries are read through their manifest; entries without a
/// readable manifest are skipped, not surfaced as errors. Archive files are
/// described from filesystem metadata alone, with the modification time
/// standing in for the creation timestamp.
pub async fn list_backups(state: &EngineState) -> Result<Vec<BackupDescriptor>> {
    let root = &state.config.backup_root;
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    let mut entries = tokio::fs::read_dir(root).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();

        if path.is_dir() {
            match read_manifest(&path).await {
                Ok(manifest) => backups.push(BackupDescriptor {
                    name: file_name,
                    path,
                    created_at: manifest.created_at,
                    cluster: Some(manifest.cluster),
                    database: Some(manifest.database),
                    collection_count: manifest.collections.len(),
                    total_documents: manifest.total_documents,
                    size_bytes: manifest.total_size,
                    compressed: false,
                }),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping directory without readable manifest");
                }
            }
        } else if archive::is_archive(&path) {
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable archive");
                    continue;
                }
            };
            let created_at: DateTime<Utc> = meta
                .modified()
                .map(Into::into)
                .unwrap_or_else(|_| Utc::now());
            backups.push(BackupDescriptor {
                name: archive::archive_stem(&file_name).to_string(),
                path,
                created_at,
                cluster: None,
                database: None,
                collection_count: 0,
                total_documents: 0,
                size_bytes: meta.len(),
                compressed: true,
            });
        }
    }

    backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(backups)
}

async fn read_manifest(dir: &Path) -> anyhow::Result<BackupManifest> {
    let raw = tokio::fs::read(dir.join(MANIFEST_FILE)).await?;
    Ok(serde_json::from_slice(&raw)?)
}
