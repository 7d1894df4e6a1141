//! Cron expression parsing and next-fire computation.
//!
//! Thin adapter over the `cron` crate. The crate wants a seconds field, so
//! standard 5-field expressions (minute, hour, day-of-month, month,
//! day-of-week) are normalized by prepending `0` before parsing.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule as CronSchedule;

use crate::error::SchedulerError;

/// Parse a cron expression into a schedule.
///
/// Accepts standard 5-field syntax as well as the 6- and 7-field forms the
/// `cron` crate understands natively. Anything else is an
/// [`SchedulerError::InvalidCron`].
pub fn parse(expression: &str) -> Result<CronSchedule, SchedulerError> {
    let trimmed = expression.trim();
    let fields = trimmed.split_whitespace().count();
    let normalized = match fields {
        5 => format!("0 {trimmed}"),
        6 | 7 => trimmed.to_string(),
        _ => {
            return Err(SchedulerError::InvalidCron {
                expression: expression.to_string(),
                reason: format!("expected 5 to 7 fields, got {fields}"),
            });
        }
    };

    CronSchedule::from_str(&normalized).map_err(|e| SchedulerError::InvalidCron {
        expression: expression.to_string(),
        reason: e.to_string(),
    })
}

/// Earliest fire time strictly after `reference`.
///
/// Never returns `reference` itself, so callers sleeping until the returned
/// instant always make progress. `None` only when the expression has no
/// future occurrence (e.g. a year field entirely in the past).
pub fn next_fire_after(
    schedule: &CronSchedule,
    reference: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    schedule.after(&reference).next()
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
