//! Retention sweeping: removes backups older than the retention window.

use crate::error::Result;
use crate::services::inventory;
use crate::state::EngineState;
use chrono::{Duration, Utc};
use tracing::{info, warn};

/// Delete every backup whose creation time precedes `now - retention_days`.
///
/// Falls back to the configured default retention when no explicit value is
/// given. A deletion failure for one backup is logged and does not stop the
/// sweep; only successfully removed backups are counted.
pub async fn cleanup_old_backups(
    state: &EngineState,
    retention_days: Option<u32>,
) -> Result<usize> {
    let days = retention_days.unwrap_or(state.config.retention_days);
    let cutoff = Utc::now() - Duration::days(i64::from(days));

    let backups = inventory::list_backups(state).await?;
    let mut removed = 0usize;

    for backup in backups {
        if backup.created_at >= cutoff {
            continue;
        }

        let result = if backup.compressed {
            tokio::fs::remove_file(&backup.path).await
        } else {
            tokio::fs::remove_dir_all(&backup.path).await
        };

        match result {
            Ok(()) => {
                info!(name = %backup.name, created_at = %backup.created_at, "Removed expired backup");
                removed += 1;
            }
            Err(e) => {
                warn!(name = %backup.name, error = %e, "Failed to remove expired backup, continuing");
            }
        }
    }

    info!(removed, days, "Retention sweep complete");
    Ok(removed)
}
