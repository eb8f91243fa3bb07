//! Manifest types describing one backup's scope and per-collection outcome.
//!
//! The manifest is serialized as `backup-info.json` inside every backup
//! directory and is the restore side's source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Manifest file name inside every uncompressed backup directory.
pub const MANIFEST_FILE: &str = "backup-info.json";

/// Backup manifest, one per backup operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupManifest {
    pub cluster: String,
    pub database: String,
    pub created_at: DateTime<Utc>,
    /// One record per collection enumerated at snapshot start, in discovery
    /// order. Failed collections are present as Failure records.
    pub collections: Vec<CollectionRecord>,
    pub total_documents: u64,
    /// Sum of serialized per-collection payload sizes in bytes. This is the
    /// logical size even when the backup is compressed afterwards.
    pub total_size: u64,
    #[serde(default)]
    pub compressed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_path: Option<String>,
}

impl BackupManifest {
    pub fn new(cluster: &str, database: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            cluster: cluster.to_string(),
            database: database.to_string(),
            created_at,
            collections: Vec::new(),
            total_documents: 0,
            total_size: 0,
            compressed: false,
            archive_path: None,
        }
    }

    /// Append a collection record, folding its counts into the totals.
    pub fn record(&mut self, record: CollectionRecord) {
        if let CollectionRecord::Success {
            document_count,
            size_bytes,
            ..
        } = &record
        {
            self.total_documents += document_count;
            self.total_size += size_bytes;
        }
        self.collections.push(record);
    }
}

/// Outcome for a single collection within a manifest. A collection either
/// snapshotted fully or failed; a record never carries both document data
/// and an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum CollectionRecord {
    Success {
        name: String,
        document_count: u64,
        size_bytes: u64,
        index_count: u64,
    },
    Failure {
        name: String,
        error: String,
    },
}

impl CollectionRecord {
    pub fn name(&self) -> &str {
        match self {
            Self::Success { name, .. } | Self::Failure { name, .. } => name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}

/// Index definition exported from and replayed into a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub name: String,
    /// Raw key-spec document, e.g. `{"email": 1}`.
    pub key: Value,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub sparse: bool,
}

impl IndexSpec {
    /// The automatic primary-key index every collection carries; it is never
    /// recreated on restore.
    pub fn is_primary(&self) -> bool {
        self.name == "_id_"
    }
}

/// Per-collection export file shape (`<collection>.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionExport {
    pub collection: String,
    pub database: String,
    pub cluster: String,
    pub documents: Vec<Value>,
    pub indexes: Vec<IndexSpec>,
    #[serde(default = "empty_stats")]
    pub stats: Value,
}

fn empty_stats() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupOptions {
    #[serde(default)]
    pub compress: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RestoreOptions {
    /// Drop a same-named target collection before inserting. Dropping a
    /// collection that does not exist is not an error.
    pub drop_existing: bool,
}
