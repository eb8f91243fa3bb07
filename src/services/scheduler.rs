//! Recurring backup scheduling with persisted schedule state.
//!
//! Triggers are in-process cron jobs, so unscheduling is a pure in-memory
//! cancellation with no external system involved. The schedule table is the
//! engine's only shared mutable state: it lives behind one mutex and every
//! (re)schedule or unschedule runs cancel-then-install under that lock, then
//! persists the whole table to the configuration store.

use crate::error::{BackupError, Result};
use crate::models::{schedule_id, BackupOptions, ScheduleEntry};
use crate::services::snapshot;
use crate::state::EngineState;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Settings key the schedule table is persisted under.
pub const SCHEDULES_KEY: &str = "backups.schedules";

struct ActiveSchedule {
    entry: ScheduleEntry,
    job_id: Uuid,
}

pub struct BackupScheduler {
    scheduler: Mutex<JobScheduler>,
    entries: Mutex<HashMap<String, ActiveSchedule>>,
    state: Arc<EngineState>,
}

impl BackupScheduler {
    pub async fn new(state: Arc<EngineState>) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| BackupError::Scheduler(e.to_string()))?;
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            entries: Mutex::new(HashMap::new()),
            state,
        })
    }

    /// Install (or replace) the recurring backup for a cluster/database
    /// pair. Returns the deterministic schedule id.
    pub async fn schedule_backup(
        &self,
        cluster: &str,
        database: &str,
        trigger_pattern: &str,
        options: BackupOptions,
    ) -> Result<String> {
        let entry = ScheduleEntry {
            id: schedule_id(cluster, database),
            cluster: cluster.to_string(),
            database: database.to_string(),
            trigger_pattern: trigger_pattern.to_string(),
            options,
            created_at: Utc::now(),
        };
        self.install(entry).await
    }

    /// Cancel a schedule. Returns whether an entry existed.
    pub async fn unschedule_backup(&self, id: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;

        let Some(existing) = entries.remove(id) else {
            return Ok(false);
        };

        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.remove(&existing.job_id).await {
            tracing::warn!(id, error = %e, "Failed to cancel trigger");
        }
        drop(scheduler);

        self.persist(&entries).await?;
        tracing::info!(id, "Backup unscheduled");
        Ok(true)
    }

    pub async fn list_scheduled_backups(&self) -> Vec<ScheduleEntry> {
        let entries = self.entries.lock().await;
        let mut list: Vec<ScheduleEntry> = entries.values().map(|a| a.entry.clone()).collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    /// Re-install every persisted schedule. A malformed persisted entry is
    /// logged and skipped; it never blocks replay of the remaining entries.
    pub async fn restore_schedules(&self) -> Result<usize> {
        let store = self.state.store.clone();
        let raw = tokio::task::spawn_blocking(move || store.get_setting(SCHEDULES_KEY))
            .await
            .map_err(|e| BackupError::Store(anyhow::anyhow!(e)))?
            .map_err(BackupError::Store)?;

        let Some(raw) = raw else {
            return Ok(0);
        };

        let table: HashMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(table) => table,
            Err(e) => {
                tracing::error!(error = %e, "Persisted schedule table is unreadable, starting empty");
                return Ok(0);
            }
        };

        let mut count = 0;
        for (id, value) in table {
            let entry: ScheduleEntry = match serde_json::from_value(value) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Skipping malformed persisted schedule");
                    continue;
                }
            };
            match self.install(entry).await {
                Ok(_) => count += 1,
                Err(e) => {
                    tracing::warn!(id = %id, error = %e, "Failed to re-install persisted schedule");
                }
            }
        }

        tracing::info!(count, "Schedules restored");
        Ok(count)
    }

    /// Start firing triggers.
    pub async fn start(&self) -> Result<()> {
        self.scheduler
            .lock()
            .await
            .start()
            .await
            .map_err(|e| BackupError::Scheduler(e.to_string()))
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.scheduler
            .lock()
            .await
            .shutdown()
            .await
            .map_err(|e| BackupError::Scheduler(e.to_string()))
    }

    /// Cancel-then-install under the table lock, then persist. Replay passes
    /// entries through here unchanged so the original `created_at` survives
    /// process restarts.
    async fn install(&self, entry: ScheduleEntry) -> Result<String> {
        // Build the job first: a rejected trigger pattern must not cost the
        // caller an already-installed schedule.
        let job = self.make_job(&entry)?;
        let job_id = job.guid();

        let mut entries = self.entries.lock().await;

        if let Some(existing) = entries.remove(&entry.id) {
            let mut scheduler = self.scheduler.lock().await;
            if let Err(e) = scheduler.remove(&existing.job_id).await {
                tracing::warn!(id = %entry.id, error = %e, "Failed to cancel replaced trigger");
            }
        }

        self.scheduler
            .lock()
            .await
            .add(job)
            .await
            .map_err(|e| BackupError::Scheduler(e.to_string()))?;

        tracing::info!(id = %entry.id, cron = %entry.trigger_pattern, "Backup scheduled");
        entries.insert(
            entry.id.clone(),
            ActiveSchedule {
                entry: entry.clone(),
                job_id,
            },
        );

        self.persist(&entries).await?;
        Ok(entry.id)
    }

    fn make_job(&self, entry: &ScheduleEntry) -> Result<Job> {
        let state = self.state.clone();
        let cluster = entry.cluster.clone();
        let database = entry.database.clone();
        let options = entry.options.clone();
        let id = entry.id.clone();

        Job::new_async(entry.trigger_pattern.as_str(), move |_uuid, _lock| {
            let state = state.clone();
            let cluster = cluster.clone();
            let database = database.clone();
            let options = options.clone();
            let id = id.clone();
            Box::pin(async move {
                tracing::info!(id = %id, "Starting scheduled backup");
                match snapshot::create_backup(&state, &cluster, &database, &options).await {
                    Ok(outcome) => {
                        tracing::info!(id = %id, name = %outcome.name, "Scheduled backup finished");
                    }
                    Err(e) => {
                        // A missed firing must not crash the process or
                        // cancel future firings.
                        tracing::error!(id = %id, error = %e, "Scheduled backup failed");
                    }
                }
            })
        })
        .map_err(|e| BackupError::Scheduler(e.to_string()))
    }

    async fn persist(&self, entries: &HashMap<String, ActiveSchedule>) -> Result<()> {
        let table: HashMap<&String, &ScheduleEntry> =
            entries.iter().map(|(id, active)| (id, &active.entry)).collect();
        let json = serde_json::to_string(&table)?;

        let store = self.state.store.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            store.set_setting(SCHEDULES_KEY, &json)?;
            store.save()
        })
        .await
        .map_err(|e| BackupError::Store(anyhow::anyhow!(e)))?
        .map_err(BackupError::Store)?;

        Ok(())
    }
}
