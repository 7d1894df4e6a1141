//! Scheduler errors.

use thiserror::Error;

use crate::schedule::ScheduleId;

/// Scheduler error types.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Cron expression could not be parsed or has no future occurrence.
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidCron { expression: String, reason: String },

    /// Required input was absent or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// No schedule with the given id.
    #[error("Schedule not found: {0}")]
    ScheduleNotFound(ScheduleId),
}
