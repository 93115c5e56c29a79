//! Gavel Clock Infrastructure
//!
//! Time sources behind the [`Clock`] port:
//! - [`SystemClock`] - wall clock for production
//! - [`ManualClock`] - pinned, explicitly advanced time for deterministic tests
//!
//! Status derivation and countdown behavior depend entirely on "now", so
//! everything above the gateway takes an `Arc<dyn Clock>` rather than
//! calling `Utc::now()` inline.

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use gavel_ports::Clock;
