use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

/// Source of "now" for upload and expiry timestamps.
///
/// The registry never reads the wall clock directly, so expiry behavior can
/// be tested deterministically instead of racing real time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Test support.
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.write().unwrap() = instant;
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.write().unwrap();
        *now = *now + delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}
