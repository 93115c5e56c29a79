use gavel_core::Timestamp;

/// Port for time abstraction
///
/// Status derivation and the countdown engine never read the wall clock
/// directly; they take time from this port so tests can pin or advance it.
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
