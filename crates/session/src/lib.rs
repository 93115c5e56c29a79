//! Gavel Session
//!
//! Ties the push gateway, the reconciler, and the notification center
//! into one per-user session:
//! - [`SyncSession`] runs the sync loops and exposes the read views
//! - [`NotificationCenter`] holds toasts and persisted notifications
//! - [`check_bid`] admits or refuses bids before any network call
//!
//! The session is transport-agnostic; tests drive it over the in-process
//! channel transport and a stubbed backend.

pub mod admission;
pub mod identity;
pub mod notifications;
pub mod session;

// Re-export commonly used types
pub use admission::{check_bid, BidRejection};
pub use identity::{Role, SessionIdentity};
pub use notifications::NotificationCenter;
pub use session::{SessionConfig, SessionError, SyncSession};
