//! Snapshot creation: point-in-time export of a database's collections.

use crate::error::{BackupError, Result};
use crate::models::{
    BackupManifest, BackupOptions, CollectionExport, CollectionRecord, MANIFEST_FILE,
};
use crate::registry::DatabaseHandle;
use crate::services::archive;
use crate::state::EngineState;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of a completed backup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupOutcome {
    pub name: String,
    /// The deliverable: the backup directory, or the archive when compressed.
    pub path: PathBuf,
    pub manifest: BackupManifest,
    /// Logical (pre-compression) payload size in bytes.
    pub size_bytes: u64,
    /// Number of collection records, failed ones included.
    pub collection_count: usize,
}

/// Create a point-in-time backup of every collection in `database`.
///
/// The collection list is enumerated once up front and drives the whole run:
/// collections created afterwards are not included, and a collection that
/// fails to export becomes a Failure record without aborting the rest. Only
/// directory creation, manifest write, or archive failures reject.
pub async fn create_backup(
    state: &EngineState,
    cluster: &str,
    database: &str,
    options: &BackupOptions,
) -> Result<BackupOutcome> {
    let db = state
        .registry
        .resolve_database(cluster, database)
        .await
        .map_err(BackupError::Registry)?;

    let created_at = Utc::now();
    let name = backup_name(cluster, database, created_at);
    let backup_dir = state.config.backup_root.join(&name);
    tokio::fs::create_dir_all(&backup_dir).await?;

    info!(cluster, database, name = %name, "Starting backup");

    let collections = db
        .list_collections()
        .await
        .map_err(BackupError::Registry)?;

    let mut manifest = BackupManifest::new(cluster, database, created_at);
    for coll_name in &collections {
        let record =
            match export_collection(db.as_ref(), cluster, database, coll_name, &backup_dir).await {
                Ok(record) => record,
                Err(e) => {
                    warn!(collection = %coll_name, error = %e, "Collection snapshot failed, continuing");
                    CollectionRecord::Failure {
                        name: coll_name.clone(),
                        error: e.to_string(),
                    }
                }
            };
        manifest.record(record);
    }

    let manifest_json = serde_json::to_vec_pretty(&manifest)?;
    tokio::fs::write(backup_dir.join(MANIFEST_FILE), manifest_json).await?;

    let path = if options.compress {
        let archive_path = state
            .config
            .backup_root
            .join(format!("{name}.{}", archive::ARCHIVE_EXT));
        archive::compress(&backup_dir, &archive_path).await?;
        tokio::fs::remove_dir_all(&backup_dir).await?;
        manifest.compressed = true;
        manifest.archive_path = Some(archive_path.to_string_lossy().into_owned());
        archive_path
    } else {
        backup_dir
    };

    info!(
        name = %name,
        collections = manifest.collections.len(),
        documents = manifest.total_documents,
        bytes = manifest.total_size,
        "Backup complete"
    );

    Ok(BackupOutcome {
        name,
        path,
        size_bytes: manifest.total_size,
        collection_count: manifest.collections.len(),
        manifest,
    })
}

/// Export one collection to `<name>.json`. Any error here is isolable: the
/// caller records it and moves on to the next collection.
async fn export_collection(
    db: &dyn DatabaseHandle,
    cluster: &str,
    database: &str,
    name: &str,
    backup_dir: &Path,
) -> anyhow::Result<CollectionRecord> {
    let coll = db.collection(name);

    let documents = coll.find_all().await?;
    let indexes = coll.list_indexes().await?;
    let stats = match coll.stats().await {
        Ok(stats) => stats,
        Err(e) => {
            warn!(collection = %name, error = %e, "Failed to read collection stats, substituting empty stats");
            Value::Object(Default::default())
        }
    };

    let export = CollectionExport {
        collection: name.to_string(),
        database: database.to_string(),
        cluster: cluster.to_string(),
        documents,
        indexes,
        stats,
    };

    let payload = serde_json::to_vec_pretty(&export)?;
    let size_bytes = payload.len() as u64;
    tokio::fs::write(backup_dir.join(format!("{name}.json")), payload).await?;

    Ok(CollectionRecord::Success {
        name: name.to_string(),
        document_count: export.documents.len() as u64,
        size_bytes,
        index_count: export.indexes.len() as u64,
    })
}

/// `{cluster}-{database}-{timestamp}` with the timestamp made
/// filesystem-safe (colons and dots replaced).
fn backup_name(cluster: &str, database: &str, at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("{cluster}-{database}-{stamp}")
}
