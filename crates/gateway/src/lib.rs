//! Gavel Gateway
//!
//! Push-channel layer for the Gavel auction client. Provides:
//! - Transport abstraction (tokio channels, with traits for real transports)
//! - Wire message types for auction deltas, notifications, and bid commands
//! - Reconnect supervision and per-topic subscription tracking
//!
//! ## Architecture
//!
//! ```text
//! Auction Server (push)
//!         │
//!    ┌────▼──────┐
//!    │ Transport │  connect / disconnect / publish / subscribe
//!    └────┬──────┘
//!         │ Topics:
//!         │ auction/{id}, user/{id}/notifications, app/bid
//!    ┌────▼──────┐
//!    │ Registry  │  one live subscription per topic, re-issued on reconnect
//!    └────┬──────┘
//!         │
//!    Reconciler / Notification fan-out
//! ```
//!
//! ## Transport
//!
//! Currently uses tokio broadcast channels for single-process operation and
//! tests. The `PushTransport` trait is the seam where a real WebSocket/STOMP
//! transport plugs in. The transport deliberately does NOT remember
//! subscriptions across reconnects - topics are derived from application
//! state, so the `SubscriptionRegistry` re-issues them.

pub mod error;
pub mod messages;
pub mod registry;
pub mod transport;

// Re-export commonly used types
pub use error::{GatewayError, TransportError};
pub use messages::{
    auction::{AuctionDelta, BidCommand},
    notification::NotificationMessage,
};
pub use registry::{SubscriptionRegistry, TopicHandler};
pub use transport::{
    Payload, PushTransport, Topics, TopicSubscriber,
    channel::ChannelTransport,
    supervisor::{ConnectionEvent, ConnectionSupervisor},
};
