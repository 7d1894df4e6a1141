//! Schedule orchestration.
//!
//! [`SchedulerService`] is the only component external callers talk to. It
//! owns the store, the id→runner map, and the injected action sink, and it
//! funnels every store/runner mutation through a single mutex so operations
//! on the same schedule id are linearized. `list` takes only the store read
//! lock and may run concurrently with mutations.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::clock;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::runner::{self, RunnerHandle, RunnerSpec};
use crate::schedule::{Schedule, ScheduleId};
use crate::sink::ActionSink;
use crate::store::ScheduleStore;

/// Result of an [`SchedulerService::update`] call.
///
/// Unknown ids are not an error, but callers get to see them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Ids whose expression and runner were replaced.
    pub updated: Vec<ScheduleId>,
    /// Ids not present in the store, skipped without error.
    pub skipped: Vec<ScheduleId>,
}

/// Orchestrates the schedule store and the per-schedule runner tasks.
pub struct SchedulerService {
    store: Arc<RwLock<ScheduleStore>>,
    runners: Mutex<HashMap<ScheduleId, RunnerHandle>>,
    sink: Arc<dyn ActionSink>,
    config: SchedulerConfig,
}

impl SchedulerService {
    /// Create a service dispatching to `sink`.
    pub fn new(sink: Arc<dyn ActionSink>, config: SchedulerConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(ScheduleStore::new())),
            runners: Mutex::new(HashMap::new()),
            sink,
            config,
        }
    }

    fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.config.dispatch_timeout_secs)
    }

    /// Register a new schedule and arm its runner.
    ///
    /// Rejects empty `url`/`cron` and unparseable expressions; on any
    /// failure nothing is inserted and no runner starts.
    pub async fn add(
        &self,
        url: impl Into<String>,
        cron: impl Into<String>,
        folder: Option<String>,
    ) -> Result<Schedule, SchedulerError> {
        let url = url.into();
        let cron = cron.into();
        if url.trim().is_empty() {
            return Err(SchedulerError::MissingField("url"));
        }
        if cron.trim().is_empty() {
            return Err(SchedulerError::MissingField("cron"));
        }

        let parsed = clock::parse(&cron)?;
        let next = clock::next_fire_after(&parsed, Utc::now()).ok_or_else(|| {
            SchedulerError::InvalidCron {
                expression: cron.clone(),
                reason: "expression has no upcoming fire times".to_string(),
            }
        })?;

        let mut runners = self.runners.lock().await;
        let record = {
            let mut store = self.store.write().await;
            store.insert(url, cron, folder, next)
        };

        let handle = runner::spawn(
            RunnerSpec {
                id: record.id,
                url: record.url.clone(),
                folder: record.folder.clone(),
                schedule: parsed,
                first_fire: next,
                dispatch_timeout: self.dispatch_timeout(),
            },
            self.store.clone(),
            self.sink.clone(),
        );
        runners.insert(record.id, handle);

        info!(
            schedule_id = record.id,
            url = %record.url,
            cron = %record.cron,
            next_run = %record.next_run,
            "schedule added"
        );
        Ok(record)
    }

    /// Replace the cron expression (and runner) for each existing id.
    ///
    /// For every id present in the store: the current runner is halted
    /// (awaited), the expression replaced, `next_run` recomputed from now,
    /// and a fresh runner armed. `last_run` survives. Unknown ids are
    /// skipped without error and reported in the outcome.
    pub async fn update(
        &self,
        ids: &[ScheduleId],
        new_cron: &str,
    ) -> Result<UpdateOutcome, SchedulerError> {
        if new_cron.trim().is_empty() {
            return Err(SchedulerError::MissingField("cron"));
        }
        let parsed = clock::parse(new_cron)?;
        let next = clock::next_fire_after(&parsed, Utc::now()).ok_or_else(|| {
            SchedulerError::InvalidCron {
                expression: new_cron.to_string(),
                reason: "expression has no upcoming fire times".to_string(),
            }
        })?;

        let mut outcome = UpdateOutcome::default();
        let mut runners = self.runners.lock().await;

        for &id in ids {
            let current = {
                let store = self.store.read().await;
                store.get(id).cloned()
            };
            let Some(mut record) = current else {
                outcome.skipped.push(id);
                continue;
            };

            // Halt before touching the record so the old expression can
            // never fire once the new one is in place.
            if let Some(handle) = runners.remove(&id) {
                handle.halt().await;
            }

            record.cron = new_cron.to_string();
            record.next_run = next;
            {
                let mut store = self.store.write().await;
                store.replace(id, record.clone())?;
            }

            let handle = runner::spawn(
                RunnerSpec {
                    id,
                    url: record.url.clone(),
                    folder: record.folder.clone(),
                    schedule: parsed.clone(),
                    first_fire: next,
                    dispatch_timeout: self.dispatch_timeout(),
                },
                self.store.clone(),
                self.sink.clone(),
            );
            runners.insert(id, handle);
            outcome.updated.push(id);
            debug!(schedule_id = id, cron = %new_cron, "schedule updated");
        }

        if !outcome.skipped.is_empty() {
            warn!(skipped = ?outcome.skipped, "update skipped unknown schedule ids");
        }
        Ok(outcome)
    }

    /// Remove schedules, halting each runner before deleting its record.
    ///
    /// Ids are processed in descending numeric order; unknown ids are
    /// skipped. Returns the ids actually removed.
    pub async fn remove(&self, ids: &[ScheduleId]) -> Vec<ScheduleId> {
        let mut ordered = ids.to_vec();
        ordered.sort_unstable_by(|a, b| b.cmp(a));
        ordered.dedup();

        let mut removed = Vec::new();
        let mut runners = self.runners.lock().await;
        for id in ordered {
            if let Some(handle) = runners.remove(&id) {
                handle.halt().await;
            }
            let deleted = {
                let mut store = self.store.write().await;
                store.delete(id)
            };
            match deleted {
                Ok(record) => {
                    info!(schedule_id = id, url = %record.url, "schedule removed");
                    removed.push(id);
                }
                Err(_) => debug!(schedule_id = id, "remove skipped unknown schedule id"),
            }
        }
        removed
    }

    /// Snapshot of all schedules in insertion order.
    pub async fn list(&self) -> Vec<Schedule> {
        self.store.read().await.list().to_vec()
    }

    /// Number of registered schedules.
    pub async fn schedule_count(&self) -> usize {
        self.store.read().await.len()
    }

    /// Number of live runner tasks.
    pub async fn runner_count(&self) -> usize {
        self.runners.lock().await.len()
    }

    /// Halt every live runner. Records stay readable afterwards.
    pub async fn shutdown(&self) {
        let mut runners = self.runners.lock().await;
        info!(count = runners.len(), "halting schedule runners");
        for (_, handle) in runners.drain() {
            handle.halt().await;
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
