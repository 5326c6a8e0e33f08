//! Manually driven clock.

use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::port::Clock;

/// Clock that only moves when told to.
///
/// Starts at 2024-05-01 12:00:00 UTC.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .expect("valid start time"),
        )
    }
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("lock clock")
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("lock clock");
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().expect("lock clock") = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        ManualClock::now(self)
    }
}
