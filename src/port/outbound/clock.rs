//! Wall-clock port.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Risk decisions, cooldowns and dedup windows all read time through this
/// trait so tests can drive it by hand.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System UTC clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
