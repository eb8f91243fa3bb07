//! Backup restoration: replays exported documents and indexes into a target
//! database.

use crate::error::{BackupError, Result};
use crate::models::{BackupManifest, CollectionExport, CollectionRecord, RestoreOptions, MANIFEST_FILE};
use crate::registry::DatabaseHandle;
use crate::services::archive;
use crate::state::EngineState;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoredCollection {
    pub name: String,
    pub document_count: u64,
    pub index_count: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreTarget {
    pub cluster: String,
    pub database: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    /// Collections actually restored; failed ones are logged and omitted.
    pub restored_collections: Vec<RestoredCollection>,
    pub source_manifest: BackupManifest,
    pub target: RestoreTarget,
}

/// Restore a backup (directory or archive) into a target database.
///
/// Best-effort contract: only manifest load/parse and archive expansion are
/// fatal. Collections that failed to snapshot are skipped, and a
/// per-collection insert or index problem is logged without failing the
/// call. Callers needing strict auditing inspect the manifest and logs.
pub async fn restore_backup(
    state: &EngineState,
    source_path: &Path,
    target_cluster: &str,
    target_database: &str,
    options: &RestoreOptions,
) -> Result<RestoreReport> {
    let db = state
        .registry
        .resolve_database(target_cluster, target_database)
        .await
        .map_err(BackupError::Registry)?;

    // Archives are expanded into a scratch directory removed on every exit
    // path, error paths included.
    let (backup_dir, _scratch) = if archive::is_archive(source_path) {
        let scratch = tempfile::tempdir()?;
        archive::expand(source_path, scratch.path()).await?;
        (scratch.path().to_path_buf(), Some(scratch))
    } else {
        (source_path.to_path_buf(), None)
    };

    let manifest_path = backup_dir.join(MANIFEST_FILE);
    let raw = tokio::fs::read(&manifest_path).await?;
    let manifest: BackupManifest = serde_json::from_slice(&raw).map_err(|source| {
        BackupError::Manifest {
            path: manifest_path,
            source,
        }
    })?;

    info!(
        source = %source_path.display(),
        cluster = target_cluster,
        database = target_database,
        collections = manifest.collections.len(),
        "Starting restore"
    );

    let mut restored = Vec::new();
    for record in &manifest.collections {
        match record {
            CollectionRecord::Failure { name, error } => {
                warn!(collection = %name, error = %error, "Skipping collection that failed to snapshot");
            }
            CollectionRecord::Success { name, .. } => {
                match restore_collection(db.as_ref(), &backup_dir, name, options).await {
                    Ok(rc) => restored.push(rc),
                    Err(e) => {
                        warn!(collection = %name, error = %e, "Failed to restore collection, continuing");
                    }
                }
            }
        }
    }

    info!(restored = restored.len(), "Restore complete");

    Ok(RestoreReport {
        restored_collections: restored,
        source_manifest: manifest,
        target: RestoreTarget {
            cluster: target_cluster.to_string(),
            database: target_database.to_string(),
        },
    })
}

async fn restore_collection(
    db: &dyn DatabaseHandle,
    backup_dir: &Path,
    name: &str,
    options: &RestoreOptions,
) -> anyhow::Result<RestoredCollection> {
    let export_path: PathBuf = backup_dir.join(format!("{name}.json"));
    let raw = tokio::fs::read(&export_path).await?;
    let export: CollectionExport = serde_json::from_slice(&raw)?;

    let coll = db.collection(name);
    if options.drop_existing {
        coll.drop_collection().await?;
    }

    let document_count = if export.documents.is_empty() {
        0
    } else {
        coll.insert_many(export.documents).await?
    };

    let mut index_count = 0u64;
    for index in &export.indexes {
        if index.is_primary() {
            continue;
        }
        match coll.create_index(index).await {
            Ok(()) => index_count += 1,
            Err(e) => {
                warn!(collection = %name, index = %index.name, error = %e, "Failed to recreate index, skipping");
            }
        }
    }

    Ok(RestoredCollection {
        name: name.to_string(),
        document_count,
        index_count,
    })
}
