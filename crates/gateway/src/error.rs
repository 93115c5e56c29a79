//! Error types for the gateway crate

use thiserror::Error;

/// Transport-level errors
///
/// None of these are fatal to the session: connection failures are retried
/// by the supervisor, and the worst-case degraded mode is snapshot polling
/// with no live push.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Subscription failed: {0}")]
    Subscribe(String),

    #[error("Send failed: {0}")]
    Send(String),

    #[error("Channel closed")]
    ChannelClosed,
}

/// Gateway-level errors (message handling on top of the transport)
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}
