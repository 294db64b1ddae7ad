//! Recurrence reset engine.
//!
//! # Responsibility
//! - Decide whether a task's current cycle has expired.
//! - Rewind progress and recompute the deadline for the new cycle.
//!
//! # Invariants
//! - One-time tasks never reset automatically.
//! - Reset is idempotent within one calendar day: after `apply_reset`,
//!   `should_reset` is false until the next cycle boundary.
//! - Resets compare calendar days only, never time of day.

use crate::model::task::{Frequency, Task};
use crate::schedule::deadline::deadline_for;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

/// The Monday on or before the given day, i.e. the start of its week cycle.
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Days::new(u64::from(today.weekday().num_days_from_monday()))
}

/// Whether the task's completion state belongs to an expired cycle.
pub fn should_reset(task: &Task, today: NaiveDate) -> bool {
    match task.frequency {
        Frequency::OneTime => false,
        Frequency::Daily => task.last_modified.date() < today,
        Frequency::Weekly => task.last_modified.date() < week_start(today),
    }
}

/// Rewinds progress for a new cycle and recomputes the deadline.
///
/// Callers must persist the task afterwards; the engine itself only
/// mutates the in-memory record.
pub fn apply_reset(task: &mut Task, now: NaiveDateTime, today: NaiveDate) {
    task.completed_count = 0;
    task.completed_at = None;
    task.last_modified = now;
    task.deadline = deadline_for(task.frequency, today, None);
}
