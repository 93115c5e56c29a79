//! Tokio channel-based transport for single-process mode
//!
//! Uses one broadcast channel per topic for pub/sub semantics within a
//! single process. No framing overhead - payloads are passed directly.
//! Tests use this transport as both ends of the link: the test publishes
//! server pushes into the same broker the client subscribes from.

use crate::error::TransportError;
use crate::transport::{Payload, PushTransport, TopicSubscriber};
use async_trait::async_trait;
use dashmap::DashMap;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

/// In-memory push transport backed by per-topic broadcast channels
///
/// `disconnect` drops every topic channel, so live subscribers observe
/// `ChannelClosed` - the same thing a dropped socket does to a real
/// transport. Reconnecting starts from an empty topic table; restoring
/// subscriptions is the registry's job.
pub struct ChannelTransport {
    topics: DashMap<String, broadcast::Sender<Payload>>,
    connected: AtomicBool,
    capacity: usize,
}

impl ChannelTransport {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: DashMap::new(),
            connected: AtomicBool::new(false),
            capacity,
        }
    }

    fn sender_for(&self, topic: &str) -> broadcast::Sender<Payload> {
        self.topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for ChannelTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PushTransport for ChannelTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            // Dropping the senders closes every live subscriber
            self.topics.clear();
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn subscribe(&self, topic: &str) -> Result<Box<dyn TopicSubscriber>, TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        // The topic table holds the only long-lived sender; clearing it on
        // disconnect is what closes this receiver
        let rx = self.sender_for(topic).subscribe();
        Ok(Box::new(ChannelSubscriber { rx }))
    }

    async fn publish(&self, topic: &str, payload: Payload) -> Result<(), TransportError> {
        if !self.is_connected() {
            debug!("dropping publish to {} while disconnected", topic);
            return Ok(());
        }
        // No subscribers is fine for fire-and-forget
        let _ = self.sender_for(topic).send(payload);
        Ok(())
    }
}

/// Subscriber over a broadcast receiver
struct ChannelSubscriber {
    rx: broadcast::Receiver<Payload>,
}

#[async_trait]
impl TopicSubscriber for ChannelSubscriber {
    async fn next(&mut self) -> Result<Payload, TransportError> {
        loop {
            match self.rx.recv().await {
                Ok(payload) => return Ok(payload),
                Err(broadcast::error::RecvError::Lagged(_)) => {
                    // Skip lagged frames and continue
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(TransportError::ChannelClosed);
                }
            }
        }
    }

    fn try_next(&mut self) -> Result<Option<Payload>, TransportError> {
        match self.rx.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(broadcast::error::TryRecvError::Empty) => Ok(None),
            Err(broadcast::error::TryRecvError::Lagged(_)) => Ok(None),
            Err(broadcast::error::TryRecvError::Closed) => Err(TransportError::ChannelClosed),
        }
    }
}
