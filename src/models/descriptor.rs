use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Inventory's view of one on-disk backup.
///
/// Derived entirely from the filesystem scan plus a best-effort manifest
/// parse; never persisted. Compressed archives expose only filesystem facts,
/// so `cluster`/`database` stay empty and the counts stay zero for them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDescriptor {
    pub name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub collection_count: usize,
    pub total_documents: u64,
    pub size_bytes: u64,
    pub compressed: bool,
}
