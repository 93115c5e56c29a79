//! Gavel Core Domain
//!
//! Pure domain types for the Gavel auction client.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    Auction,
    AuctionStatus,
    Bid,
    Notification,
    NotificationKind,
    Toast,
};
pub use values::{AuctionId, BidId, NotificationId, Price, Timestamp, ToastId, UserId};
