//! Per-topic subscription tracking
//!
//! The registry guarantees at most one live subscription per topic per
//! session and owns the dispatch task that feeds each topic's handler.
//! Topics are recorded even while the transport is down, because the
//! tracked set is derived from application state (visible auctions plus the
//! user's notification topic), not from the channel's memory; after a
//! reconnect, `resubscribe_all` re-issues exactly the recorded topics.

use crate::error::TransportError;
use crate::transport::{Payload, PushTransport};
use dashmap::DashMap;
use log::{debug, warn};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Callback invoked with every frame delivered on a topic
///
/// Handlers run on the topic's dispatch task, so frames within one topic
/// are handled in delivery order. No ordering holds across topics.
pub type TopicHandler = Arc<dyn Fn(Payload) + Send + Sync>;

struct Subscription {
    handler: TopicHandler,
    /// Live dispatch task; None while the transport is down
    task: Option<JoinHandle<()>>,
}

/// Tracks active topic subscriptions, deduplicated by topic key
pub struct SubscriptionRegistry {
    transport: Arc<dyn PushTransport>,
    entries: DashMap<String, Subscription>,
}

impl SubscriptionRegistry {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self {
            transport,
            entries: DashMap::new(),
        }
    }

    /// Subscribe to `topic` unless already tracked (duplicate is a no-op)
    ///
    /// While disconnected the topic is recorded anyway and activated by the
    /// next `resubscribe_all`.
    pub async fn ensure_subscribed(&self, topic: &str, handler: TopicHandler) {
        if self.entries.contains_key(topic) {
            return;
        }
        let task = self.activate(topic, handler.clone()).await;
        self.entries
            .insert(topic.to_string(), Subscription { handler, task });
    }

    /// Re-issue subscribe calls for every tracked topic
    ///
    /// Used after a reconnect; existing dispatch tasks (dead after the old
    /// link closed) are replaced, and the tracked set is left unchanged.
    pub async fn resubscribe_all(&self) {
        let tracked: Vec<(String, TopicHandler)> = self
            .entries
            .iter_mut()
            .map(|mut entry| {
                if let Some(task) = entry.task.take() {
                    task.abort();
                }
                (entry.key().clone(), entry.handler.clone())
            })
            .collect();

        for (topic, handler) in tracked {
            let task = self.activate(&topic, handler).await;
            match self.entries.get_mut(&topic) {
                Some(mut entry) => entry.task = task,
                // Unsubscribed while we were re-issuing; drop the orphan
                None => {
                    if let Some(task) = task {
                        task.abort();
                    }
                }
            }
        }
    }

    /// Stop tracking `topic` and abort its dispatch task (best-effort;
    /// a frame already handed to the handler may still complete)
    pub fn unsubscribe(&self, topic: &str) {
        if let Some((_, sub)) = self.entries.remove(topic) {
            if let Some(task) = sub.task {
                task.abort();
            }
        }
    }

    /// Release every tracked subscription (view teardown)
    pub fn unsubscribe_all(&self) {
        self.entries.retain(|_, sub| {
            if let Some(task) = sub.task.take() {
                task.abort();
            }
            false
        });
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.entries.contains_key(topic)
    }

    /// Currently tracked topics, in no particular order
    pub fn topics(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscribe on the transport and spawn the dispatch loop
    async fn activate(&self, topic: &str, handler: TopicHandler) -> Option<JoinHandle<()>> {
        match self.transport.subscribe(topic).await {
            Ok(mut subscriber) => {
                let topic = topic.to_string();
                Some(tokio::spawn(async move {
                    loop {
                        match subscriber.next().await {
                            Ok(payload) => handler(payload),
                            Err(TransportError::ChannelClosed) => {
                                debug!("dispatch for {} stopped: channel closed", topic);
                                break;
                            }
                            Err(e) => {
                                warn!("dispatch for {} stopped: {}", topic, e);
                                break;
                            }
                        }
                    }
                }))
            }
            Err(e) => {
                debug!("subscribe to {} deferred until reconnect: {}", topic, e);
                None
            }
        }
    }
}

impl Drop for SubscriptionRegistry {
    fn drop(&mut self) {
        self.unsubscribe_all();
    }
}
