//! Wire message types carried on the push channel
//!
//! All payloads are JSON with camelCase keys, matching the server. Typed
//! parsing happens at the subscriber edge via the `from_payload` helpers;
//! a frame that fails to parse is dropped by the caller.

pub mod auction;
pub mod notification;

pub use auction::{AuctionDelta, BidCommand};
pub use notification::NotificationMessage;
