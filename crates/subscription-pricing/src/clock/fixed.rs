//! Fixed Clock
//!
//! For tests and reproducible runs. Always reports the same instant.

use chrono::{DateTime, Utc};

use super::Clock;

/// Clock pinned to a given instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
