//! Self-rescheduling timer for background session re-validation.
//!
//! Hosts without a native interval (the CLI `watch` loop, tests) poll
//! [`ValidationSchedule::poll`] with the current time; each due tick
//! schedules the next one a full interval later.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::cell::Cell;

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug)]
pub struct ValidationSchedule {
    interval: TimeDelta,
    next_due: Cell<DateTime<Utc>>,
}

impl ValidationSchedule {
    /// First tick is due one `interval` after `start`.
    #[must_use]
    pub fn new(interval: TimeDelta, start: DateTime<Utc>) -> Self {
        Self { interval, next_due: Cell::new(start + interval) }
    }

    #[must_use]
    pub fn next_due(&self) -> DateTime<Utc> {
        self.next_due.get()
    }

    /// Whether a tick is due at `now`. A due tick reschedules itself from
    /// `now`, so ticks missed while the host was suspended collapse into one.
    pub fn poll(&self, now: DateTime<Utc>) -> bool {
        if now < self.next_due.get() {
            return false;
        }
        self.next_due.set(now + self.interval);
        true
    }

    /// Time left until the next tick, zero when overdue.
    #[must_use]
    pub fn until_next(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.next_due.get() - now).max(TimeDelta::zero())
    }
}
