use chrono::Utc;
use gavel_core::Timestamp;
use gavel_ports::Clock;

/// Real system clock for production use
///
/// Simply returns the current wall-clock time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
