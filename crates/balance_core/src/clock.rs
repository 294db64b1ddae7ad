//! Wall-clock abstraction for deterministic scheduling.
//!
//! # Responsibility
//! - Provide the current naive local time to services and schedulers.
//!
//! # Invariants
//! - All recurrence and deadline math runs on naive local time; no
//!   timezone conversion happens past this seam.

use chrono::{Local, NaiveDate, NaiveDateTime};

/// Source of "now" for services. Production code uses [`SystemClock`];
/// tests inject [`FixedClock`].
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Real wall clock in the machine's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn fixed_clock_reports_pinned_instant() {
        let clock = FixedClock::new(at(2024, 3, 4, 9, 30));
        assert_eq!(clock.now(), at(2024, 3, 4, 9, 30));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }
}
