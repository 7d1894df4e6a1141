//! Per-schedule timer tasks.
//!
//! Each active schedule owns exactly one runner task. The runner sleeps
//! until the schedule's next fire time, dispatches to the action sink,
//! advances the stored `last_run`/`next_run`, and re-arms. Cancellation is
//! observed at every wake via a [`CancellationToken`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule as CronSchedule;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::clock;
use crate::schedule::ScheduleId;
use crate::sink::ActionSink;
use crate::store::ScheduleStore;

/// Handle to a live runner task.
pub(crate) struct RunnerHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl RunnerHandle {
    /// Cancel the runner and wait for the task to exit.
    ///
    /// Once this returns, no further firing can happen for this handle, so
    /// the caller may safely replace or delete the schedule record.
    pub(crate) async fn halt(self) {
        self.token.cancel();
        if let Err(e) = self.join.await {
            if e.is_panic() {
                warn!("runner task panicked during halt: {e}");
            }
        }
    }
}

/// Everything a runner needs to drive one schedule.
///
/// `url` and `folder` are snapshotted at spawn time; `update` replaces the
/// whole runner, so they cannot go stale.
pub(crate) struct RunnerSpec {
    pub id: ScheduleId,
    pub url: String,
    pub folder: Option<String>,
    pub schedule: CronSchedule,
    pub first_fire: DateTime<Utc>,
    pub dispatch_timeout: Duration,
}

/// Spawn the timer task for one schedule.
pub(crate) fn spawn(
    spec: RunnerSpec,
    store: Arc<RwLock<ScheduleStore>>,
    sink: Arc<dyn ActionSink>,
) -> RunnerHandle {
    let token = CancellationToken::new();
    let join = tokio::spawn(run(spec, store, sink, token.clone()));
    RunnerHandle { token, join }
}

async fn run(
    spec: RunnerSpec,
    store: Arc<RwLock<ScheduleStore>>,
    sink: Arc<dyn ActionSink>,
    token: CancellationToken,
) {
    let RunnerSpec {
        id,
        url,
        folder,
        schedule,
        first_fire,
        dispatch_timeout,
    } = spec;

    let mut next = first_fire;
    debug!(schedule_id = id, next_run = %next, "runner armed");

    loop {
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        match tokio::time::timeout(dispatch_timeout, sink.enqueue(&url, folder.as_deref())).await {
            Ok(Ok(())) => debug!(schedule_id = id, %url, "dispatched"),
            Ok(Err(e)) => warn!(schedule_id = id, %url, "dispatch failed: {e}"),
            Err(_) => warn!(
                schedule_id = id,
                %url,
                timeout_secs = dispatch_timeout.as_secs(),
                "dispatch timed out"
            ),
        }

        // A fire is consumed whether or not dispatch succeeded. Advancing
        // from max(now, next) keeps next_run strictly increasing.
        let fired_at = Utc::now();
        let reference = if fired_at > next { fired_at } else { next };
        let upcoming = clock::next_fire_after(&schedule, reference);

        {
            let mut guard = store.write().await;
            if let Some(record) = guard.get_mut(id) {
                record.last_run = Some(fired_at);
                if let Some(n) = upcoming {
                    record.next_run = n;
                }
            }
        }

        match upcoming {
            Some(n) => next = n,
            None => {
                warn!(schedule_id = id, "no further occurrences, runner stopping");
                break;
            }
        }
    }

    debug!(schedule_id = id, "runner stopped");
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
