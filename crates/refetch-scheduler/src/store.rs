//! In-memory schedule registry.
//!
//! Not concurrency-safe on its own; all access goes through
//! [`SchedulerService`](crate::service::SchedulerService), which owns the
//! locking discipline.

use chrono::{DateTime, Utc};

use crate::error::SchedulerError;
use crate::schedule::{Schedule, ScheduleId};

/// Insertion-ordered schedule registry with monotonic id allocation.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    records: Vec<Schedule>,
    next_id: ScheduleId,
}

impl ScheduleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record and return a copy of it.
    ///
    /// The assigned id comes from a counter that only moves forward, never
    /// from the current record count, so ids are not reused after removals.
    pub fn insert(
        &mut self,
        url: String,
        cron: String,
        folder: Option<String>,
        next_run: DateTime<Utc>,
    ) -> Schedule {
        self.next_id += 1;
        let record = Schedule {
            id: self.next_id,
            url,
            cron,
            folder,
            last_run: None,
            next_run,
        };
        self.records.push(record.clone());
        record
    }

    /// Look up a record by id.
    pub fn get(&self, id: ScheduleId) -> Option<&Schedule> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: ScheduleId) -> Option<&mut Schedule> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Whether a record with `id` exists.
    pub fn contains(&self, id: ScheduleId) -> bool {
        self.get(id).is_some()
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Schedule] {
        &self.records
    }

    /// Replace the record for `id` wholesale, keeping its id.
    pub fn replace(&mut self, id: ScheduleId, record: Schedule) -> Result<(), SchedulerError> {
        let slot = self
            .get_mut(id)
            .ok_or(SchedulerError::ScheduleNotFound(id))?;
        *slot = Schedule { id, ..record };
        Ok(())
    }

    /// Remove and return the record for `id`.
    pub fn delete(&mut self, id: ScheduleId) -> Result<Schedule, SchedulerError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(SchedulerError::ScheduleNotFound(id))?;
        Ok(self.records.remove(index))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
