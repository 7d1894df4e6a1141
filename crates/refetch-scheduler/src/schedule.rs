//! Schedule record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a registered schedule.
///
/// Ids are handed out by the store from a counter that only moves forward,
/// so an id is never reused within a process lifetime, even after removal.
pub type ScheduleId = u64;

/// A registered download schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique schedule id.
    pub id: ScheduleId,
    /// URL to download when the schedule fires.
    pub url: String,
    /// Cron expression driving the fire times.
    pub cron: String,
    /// Optional destination folder hint, relative to the download root.
    pub folder: Option<String>,
    /// When the schedule last fired, if ever.
    pub last_run: Option<DateTime<Utc>>,
    /// Next planned fire time.
    pub next_run: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_schedule_wire_shape() {
        let schedule = Schedule {
            id: 7,
            url: "https://example.com/episode.mp3".to_string(),
            cron: "0 6 * * *".to_string(),
            folder: None,
            last_run: None,
            next_run: Utc.with_ymd_and_hms(2026, 8, 5, 6, 0, 0).unwrap(),
        };
        let json = serde_json::to_value(&schedule).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["url"], "https://example.com/episode.mp3");
        assert_eq!(json["cron"], "0 6 * * *");
        assert!(json["folder"].is_null());
        assert!(json["last_run"].is_null());
        assert_eq!(json["next_run"], "2026-08-05T06:00:00Z");
    }
}
