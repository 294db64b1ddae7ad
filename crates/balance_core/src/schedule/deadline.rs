//! Deadline calculator.
//!
//! # Responsibility
//! - Map (frequency, reference day, optional custom date) to the cycle
//!   deadline timestamp.
//!
//! # Invariants
//! - One-time deadlines land on 23:59:59 of their day.
//! - Daily deadlines are the next midnight after the reference day.
//! - Weekly deadlines are the next Monday midnight strictly after the
//!   reference day; a Monday reference yields Monday + 7.

use crate::model::task::Frequency;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};

/// Last second of the given calendar day.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(23, 59, 59)
        .expect("23:59:59 is a valid wall-clock time")
}

/// Midnight starting the given calendar day.
pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_hms_opt(0, 0, 0)
        .expect("midnight is a valid wall-clock time")
}

/// Midnight starting the day after the given calendar day.
pub fn start_of_next_day(day: NaiveDate) -> NaiveDateTime {
    start_of_day(day + Days::new(1))
}

/// The next Monday strictly after the given day.
///
/// A Monday input maps seven days forward, never to itself.
pub fn next_monday_after(day: NaiveDate) -> NaiveDate {
    let days_ahead = (7 - day.weekday().num_days_from_monday()) % 7;
    let days_ahead = if days_ahead == 0 { 7 } else { days_ahead };
    day + Days::new(u64::from(days_ahead))
}

/// Computes the deadline for a task cycle.
///
/// `custom_date` applies to one-time tasks only; recurring frequencies
/// ignore it and derive everything from `reference_day`.
pub fn deadline_for(
    frequency: Frequency,
    reference_day: NaiveDate,
    custom_date: Option<NaiveDate>,
) -> NaiveDateTime {
    match frequency {
        Frequency::OneTime => end_of_day(custom_date.unwrap_or(reference_day)),
        Frequency::Daily => start_of_next_day(reference_day),
        Frequency::Weekly => start_of_day(next_monday_after(reference_day)),
    }
}
