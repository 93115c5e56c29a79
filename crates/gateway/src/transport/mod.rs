//! Transport abstraction layer
//!
//! Unified traits for the persistent push channel, implemented over tokio
//! channels for single-process operation. The trait seam is where a real
//! WebSocket/STOMP transport plugs in later.
//!
//! Semantics the traits guarantee:
//! - `publish` while disconnected is silently dropped (fire-and-forget)
//! - `disconnect` is idempotent and closes every live subscriber
//! - subscriptions are NOT restored on reconnect; dropping a
//!   [`TopicSubscriber`] deregisters it

pub mod channel;
pub mod config;
pub mod supervisor;

pub use config::Topics;

use crate::error::TransportError;
use async_trait::async_trait;

/// Raw frame carried on every topic; typed parsing happens at the edge
pub type Payload = serde_json::Value;

/// The persistent push connection
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Initiate a connection attempt; idempotent while connected
    async fn connect(&self) -> Result<(), TransportError>;

    /// Tear the connection down; idempotent. Live subscribers observe
    /// [`TransportError::ChannelClosed`].
    async fn disconnect(&self);

    fn is_connected(&self) -> bool;

    /// Register interest in a topic; fails while disconnected
    async fn subscribe(&self, topic: &str) -> Result<Box<dyn TopicSubscriber>, TransportError>;

    /// Fire-and-forget send. Returns Ok and drops the frame while
    /// disconnected - this is not a request/response channel.
    async fn publish(&self, topic: &str, payload: Payload) -> Result<(), TransportError>;
}

/// Receiving end of one topic subscription
#[async_trait]
pub trait TopicSubscriber: Send {
    /// Wait for the next frame
    async fn next(&mut self) -> Result<Payload, TransportError>;

    /// Try to receive without blocking (returns None if no frame available)
    fn try_next(&mut self) -> Result<Option<Payload>, TransportError>;
}
