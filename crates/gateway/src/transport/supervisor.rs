//! Connection supervision with fixed-delay reconnect
//!
//! Owns the connect/watch/retry loop for the push channel. Connection
//! failure is never fatal: the session keeps serving the last reconciled
//! snapshot and polls until the link comes back.

use crate::transport::PushTransport;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
const DEFAULT_WATCHDOG_INTERVAL: Duration = Duration::from_secs(1);

/// Connection lifecycle events for interested components
///
/// The registry listens for `Connected` to re-issue its tracked topics;
/// the transport itself never restores subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected,
    Lost,
}

/// Drives the reconnect loop for a [`PushTransport`]
pub struct ConnectionSupervisor {
    transport: Arc<dyn PushTransport>,
    retry_delay: Duration,
    watchdog_interval: Duration,
    events: broadcast::Sender<ConnectionEvent>,
}

impl ConnectionSupervisor {
    pub fn new(transport: Arc<dyn PushTransport>) -> Self {
        Self::with_timings(transport, DEFAULT_RETRY_DELAY, DEFAULT_WATCHDOG_INTERVAL)
    }

    /// Custom timings, mainly for tests
    pub fn with_timings(
        transport: Arc<dyn PushTransport>,
        retry_delay: Duration,
        watchdog_interval: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            transport,
            retry_delay,
            watchdog_interval,
            events,
        }
    }

    /// Subscribe to connection lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.events.subscribe()
    }

    /// Primary execution loop with reconnection logic
    ///
    /// Runs until the owning task is aborted. Abort before calling
    /// `disconnect` on teardown, or the supervisor will dial right back.
    pub async fn run(&self) {
        loop {
            match self.transport.connect().await {
                Ok(()) => {
                    info!("push channel connected");
                    let _ = self.events.send(ConnectionEvent::Connected);
                    self.watch_link().await;
                    warn!(
                        "push channel lost; reconnecting in {}s",
                        self.retry_delay.as_secs_f64()
                    );
                    let _ = self.events.send(ConnectionEvent::Lost);
                }
                Err(e) => {
                    warn!(
                        "push channel connect failed: {}; retrying in {}s",
                        e,
                        self.retry_delay.as_secs_f64()
                    );
                    let _ = self.events.send(ConnectionEvent::Lost);
                }
            }
            tokio::time::sleep(self.retry_delay).await;
        }
    }

    /// Watchdog: returns once the transport reports the link down
    async fn watch_link(&self) {
        while self.transport.is_connected() {
            tokio::time::sleep(self.watchdog_interval).await;
        }
    }
}

impl std::fmt::Debug for ConnectionSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSupervisor")
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}
