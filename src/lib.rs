//! Backup and restore engine for document-database clusters.
//!
//! Produces point-in-time exports of a database's collections, restores them
//! into a (possibly different) cluster/database, runs snapshots on persisted
//! cron schedules, and reclaims storage via retention sweeps.
//!
//! The engine talks to the outside world through two traits: a
//! [`registry::ClusterRegistry`] that resolves cluster/database names to live
//! handles, and a [`store::ConfigStore`] that persists the schedule table.
//! Front ends (CLI/HTTP/WS) sit on top of the exposed operations and are not
//! part of this crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod registry;
pub mod services;
pub mod state;
pub mod store;

// Re-export the operation surface.
pub use config::EngineConfig;
pub use error::{BackupError, Result};
pub use models::{
    BackupDescriptor, BackupManifest, BackupOptions, CollectionRecord, IndexSpec, RestoreOptions,
    ScheduleEntry,
};
pub use services::inventory::list_backups;
pub use services::restore::{restore_backup, RestoreReport};
pub use services::retention::cleanup_old_backups;
pub use services::scheduler::BackupScheduler;
pub use services::snapshot::{create_backup, BackupOutcome};
pub use state::EngineState;
