//! Engine configuration.

use std::path::PathBuf;

pub const DEFAULT_RETENTION_DAYS: u32 = 30;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory all backups are written under.
    pub backup_root: PathBuf,
    /// Default age threshold for the retention sweeper.
    pub retention_days: u32,
    pub log_level: String,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            backup_root: PathBuf::from(
                std::env::var("BACKUP_ROOT").unwrap_or_else(|_| "./backups".into()),
            ),
            retention_days: std::env::var("BACKUP_RETENTION_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETENTION_DAYS),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
        }
    }

    /// Configuration rooted at an explicit directory, defaults elsewhere.
    pub fn with_root(backup_root: impl Into<PathBuf>) -> Self {
        Self {
            backup_root: backup_root.into(),
            retention_days: DEFAULT_RETENTION_DAYS,
            log_level: "info".into(),
        }
    }
}
