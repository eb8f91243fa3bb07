use crate::models::BackupOptions;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Deterministic schedule id: at most one active schedule per
/// (cluster, database) pair.
pub fn schedule_id(cluster: &str, database: &str) -> String {
    format!("{cluster}-{database}")
}

/// One persisted recurring-backup registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub id: String,
    pub cluster: String,
    pub database: String,
    /// Cron text in the host scheduler's syntax; opaque to the engine.
    pub trigger_pattern: String,
    #[serde(default)]
    pub options: BackupOptions,
    pub created_at: DateTime<Utc>,
}
