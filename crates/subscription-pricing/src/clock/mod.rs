//! Clock Integration
//!
//! Pricing needs exactly one notion of "today". It is read through this seam
//! once per context so the rest of the engine stays a pure function of its
//! inputs.

mod fixed;

pub use fixed::FixedClock;

use chrono::{DateTime, NaiveTime, TimeDelta, Utc};

/// Source of the current instant (Strategy pattern)
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current instant truncated to midnight UTC
    fn today(&self) -> DateTime<Utc> {
        start_of_day(self.now())
    }
}

/// Wall clock captured once, when the clock is created
///
/// Every context priced through the same clock sees the same "today", even
/// if pricing straddles midnight.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    started_at: DateTime<Utc>,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// Midnight UTC of the given instant's day
pub fn start_of_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Last representable instant (nanosecond precision) of the day before `instant`
pub fn end_of_previous_day(instant: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(instant) - TimeDelta::nanoseconds(1)
}
