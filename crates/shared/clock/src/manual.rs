use chrono::Duration;
use gavel_core::Timestamp;
use gavel_ports::Clock;
use std::sync::RwLock;

/// Manually controlled clock for deterministic tests
///
/// Time only moves when explicitly set or advanced, so countdown and
/// status-derivation tests can walk an auction through its lifecycle
/// without sleeping.
pub struct ManualClock {
    now: RwLock<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: RwLock::new(start),
        }
    }

    /// Pin the clock to a specific instant
    pub fn set(&self, time: Timestamp) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now = time;
    }

    /// Move the clock forward (or backward, with a negative duration)
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().expect("clock lock poisoned");
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.read().expect("clock lock poisoned")
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}
