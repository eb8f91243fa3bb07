//! Error types for the backup engine.
//!
//! Only operation-fatal failures surface here; per-item failures (a single
//! collection, index, or deletion) are logged and recorded in results
//! instead of being raised.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid manifest at {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("scheduler error: {0}")]
    Scheduler(String),

    #[error("schedule store error: {0}")]
    Store(anyhow::Error),

    /// Connection-registry failure, propagated unchanged.
    #[error(transparent)]
    Registry(anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BackupError>;
