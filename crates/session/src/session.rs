//! Session orchestration
//!
//! One [`SyncSession`] per signed-in user. It owns the canonical auction
//! table, the subscription registry, the notification center, and the
//! background loops that keep them current:
//! - connection supervision with re-subscribe on reconnect
//! - periodic snapshot refresh as the safety net under push deltas
//! - per-second countdown ticks for end-of-auction events
//!
//! Every loop holds only a weak reference to the session, so dropping the
//! last strong handle (after `close`) unwinds the whole thing.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use gavel_core::{Auction, AuctionId, AuctionStatus, NotificationKind, Price};
use gavel_gateway::{
    AuctionDelta, BidCommand, ConnectionEvent, ConnectionSupervisor, NotificationMessage, Payload,
    PushTransport, SubscriptionRegistry, TopicHandler, Topics, TransportError,
};
use gavel_ports::{ApiError, BackendApi, Clock};
use gavel_sync::{percent_elapsed, time_left, AuctionTable, CountdownEngine, DeltaOutcome};

use crate::admission::{check_bid, BidRejection};
use crate::identity::{Role, SessionIdentity};
use crate::notifications::NotificationCenter;

/// Session failures surfaced to the caller
///
/// Toast side effects happen before these are returned; a caller that
/// only renders toasts can ignore the value.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("auction {0} is not in the current view")]
    UnknownAuction(AuctionId),

    #[error(transparent)]
    Rejected(#[from] BidRejection),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("push channel error: {0}")]
    Transport(#[from] TransportError),
}

/// Loop timings, overridable for tests
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Full snapshot re-fetch cadence
    pub snapshot_refresh: Duration,
    /// Countdown evaluation cadence
    pub countdown_tick: Duration,
    /// Reconnect delay after a lost push channel
    pub retry_delay: Duration,
    /// How often the supervisor polls the link
    pub watchdog_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            snapshot_refresh: Duration::from_secs(15),
            countdown_tick: Duration::from_secs(1),
            retry_delay: Duration::from_secs(5),
            watchdog_interval: Duration::from_secs(1),
        }
    }
}

/// Live auction session for one user
pub struct SyncSession {
    /// Self-handle for background loops and topic handlers; the loops
    /// upgrade it per iteration and exit once the session is gone
    weak: Weak<SyncSession>,
    identity: SessionIdentity,
    api: Arc<dyn BackendApi>,
    transport: Arc<dyn PushTransport>,
    registry: SubscriptionRegistry,
    table: Arc<AuctionTable>,
    countdown: Mutex<CountdownEngine>,
    notifications: Arc<NotificationCenter>,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncSession {
    pub fn new(
        identity: SessionIdentity,
        api: Arc<dyn BackendApi>,
        transport: Arc<dyn PushTransport>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Self::with_config(identity, api, transport, clock, SessionConfig::default())
    }

    pub fn with_config(
        identity: SessionIdentity,
        api: Arc<dyn BackendApi>,
        transport: Arc<dyn PushTransport>,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            registry: SubscriptionRegistry::new(transport.clone()),
            table: Arc::new(AuctionTable::new()),
            countdown: Mutex::new(CountdownEngine::new()),
            notifications: NotificationCenter::new(clock.clone()),
            identity,
            api,
            transport,
            clock,
            config,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// Hydrate state and launch the background loops
    ///
    /// Initial fetch failures are tolerated: the push channel's supervisor
    /// keeps dialing and the refresh loop retries, so a session started
    /// against a briefly unreachable backend heals on its own.
    pub async fn start(&self) {
        info!(
            "session start for user {} ({})",
            self.identity.user_id, self.identity.role
        );

        if let Err(e) = self.notifications.load_persisted(self.api.as_ref()).await {
            warn!("notification history unavailable: {}", e);
        }
        if let Err(e) = self.refresh_snapshot().await {
            warn!("initial snapshot failed: {}", e);
        }

        let supervisor = Arc::new(ConnectionSupervisor::with_timings(
            self.transport.clone(),
            self.config.retry_delay,
            self.config.watchdog_interval,
        ));
        let mut events = supervisor.subscribe();

        let mut tasks = self.tasks.lock().expect("task lock poisoned");
        tasks.push(tokio::spawn(async move { supervisor.run().await }));

        let weak = self.weak.clone();
        tasks.push(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(ConnectionEvent::Connected) => {
                        let Some(session) = weak.upgrade() else { break };
                        session.registry.resubscribe_all().await;
                        // Re-fetch to cover deltas missed while down
                        if let Err(e) = session.refresh_snapshot().await {
                            warn!("post-reconnect refresh failed: {}", e);
                        }
                    }
                    Ok(ConnectionEvent::Lost) => {
                        warn!("push channel down; serving last reconciled state");
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));

        let weak = self.weak.clone();
        let refresh = self.config.snapshot_refresh;
        tasks.push(tokio::spawn(async move {
            loop {
                tokio::time::sleep(refresh).await;
                let Some(session) = weak.upgrade() else { break };
                if let Err(e) = session.refresh_snapshot().await {
                    warn!("snapshot refresh failed: {}", e);
                }
            }
        }));

        let weak = self.weak.clone();
        let tick = self.config.countdown_tick;
        tasks.push(tokio::spawn(async move {
            loop {
                tokio::time::sleep(tick).await;
                let Some(session) = weak.upgrade() else { break };
                session.tick_countdowns();
            }
        }));
    }

    /// Stop the loops, release subscriptions, and drop the link
    pub async fn close(&self) {
        for task in self.tasks.lock().expect("task lock poisoned").drain(..) {
            task.abort();
        }
        self.registry.unsubscribe_all();
        self.transport.disconnect().await;
        self.notifications.shutdown();
        info!("session closed for user {}", self.identity.user_id);
    }

    // === Reconciliation ===

    /// Fetch the role-appropriate snapshot and make it canonical
    pub async fn refresh_snapshot(&self) -> Result<(), SessionError> {
        let auctions = match self.identity.role {
            Role::Seller => self.api.my_auctions().await?,
            _ => self.api.live_auctions().await?,
        };
        debug!("snapshot applied: {} auctions", auctions.len());
        self.table.apply_snapshot(auctions);
        // Fired flags survive the re-sync; only departed auctions forget
        self.countdown
            .lock()
            .expect("countdown lock poisoned")
            .prune(&self.table.all());
        self.sync_subscriptions().await;
        Ok(())
    }

    /// Align tracked topics with the current working set
    ///
    /// One topic per visible auction plus the user's notification topic.
    /// Newly visible auctions are subscribed, existing subscriptions are
    /// left untouched, and nothing is unsubscribed eagerly; an auction
    /// that left the snapshot may still be on screen, and its topic is
    /// released with everything else on `close`.
    async fn sync_subscriptions(&self) {
        for id in self.table.ids() {
            let weak = self.weak.clone();
            let handler: TopicHandler = Arc::new(move |payload| {
                if let Some(session) = weak.upgrade() {
                    session.on_auction_frame(id, payload);
                }
            });
            self.registry
                .ensure_subscribed(&Topics::auction(id), handler)
                .await;
        }

        let weak = self.weak.clone();
        let handler: TopicHandler = Arc::new(move |payload| {
            if let Some(session) = weak.upgrade() {
                session.on_notification_frame(payload);
            }
        });
        self.registry
            .ensure_subscribed(&Topics::user_notifications(self.identity.user_id), handler)
            .await;
    }

    /// Handle one frame from an `auction/{id}` topic
    fn on_auction_frame(&self, id: AuctionId, payload: Payload) {
        let delta = match AuctionDelta::from_payload(payload) {
            Ok(delta) => delta,
            Err(e) => {
                debug!("malformed frame on {} dropped: {}", Topics::auction(id), e);
                return;
            }
        };

        match self.table.apply_delta(id, &delta) {
            DeltaOutcome::Unknown => {}
            DeltaOutcome::Applied(applied) => {
                if applied.ended {
                    if applied.highest_bidder == Some(self.identity.user_id) {
                        self.notifications
                            .notify("You won this auction", NotificationKind::Success);
                    } else {
                        self.notifications
                            .notify("Auction ended", NotificationKind::Warning);
                    }
                } else if applied.price_observed {
                    self.notifications
                        .notify("New highest bid placed", NotificationKind::Info);
                }
            }
        }
    }

    /// Handle one frame from the user's notification topic
    fn on_notification_frame(&self, payload: Payload) {
        match NotificationMessage::from_payload(payload) {
            Ok(message) => {
                self.notifications.notify(message.message, message.kind);
            }
            Err(e) => debug!("malformed notification frame dropped: {}", e),
        }
    }

    /// One countdown pass over the working set
    fn tick_countdowns(&self) {
        let now = self.clock.now();
        let auctions = self.table.all();
        let ended = self
            .countdown
            .lock()
            .expect("countdown lock poisoned")
            .tick(&auctions, now);
        for event in ended {
            info!("auction {} reached its end time", event.id);
            self.notifications.notify(
                format!("Auction ended: {}", event.product_name),
                NotificationKind::Warning,
            );
        }
    }

    // === Commands ===

    /// Place a bid on a visible auction
    ///
    /// Admission runs against the local view first; a rejection makes no
    /// network call and raises no toast. An admitted bid goes to the
    /// backend, is echoed on the push channel, and toasts its outcome.
    pub async fn place_bid(&self, auction_id: AuctionId, amount: Price) -> Result<(), SessionError> {
        let auction = self
            .table
            .get(auction_id)
            .ok_or(SessionError::UnknownAuction(auction_id))?;
        check_bid(&self.identity, &auction, amount, self.clock.now())?;

        match self.api.place_bid(auction_id, amount).await {
            Ok(()) => {
                let command = BidCommand::new(auction_id, amount);
                if let Err(e) = self
                    .transport
                    .publish(Topics::BID_SUBMIT, command.to_payload())
                    .await
                {
                    debug!("bid echo skipped: {}", e);
                }
                self.notifications
                    .notify("Bid placed successfully!", NotificationKind::Success);
                if let Err(e) = self.refresh_snapshot().await {
                    warn!("refresh after bid failed: {}", e);
                }
                Ok(())
            }
            Err(ApiError::Conflict) => {
                self.notifications
                    .notify("Bid failed – higher bid exists", NotificationKind::Error);
                Err(ApiError::Conflict.into())
            }
            Err(e) => {
                self.notifications
                    .notify("Failed to place bid", NotificationKind::Error);
                Err(e.into())
            }
        }
    }

    /// Enable or disable one of the user's listings (seller command)
    pub async fn set_enabled(&self, auction_id: AuctionId, enabled: bool) -> Result<(), SessionError> {
        if let Err(e) = self.api.set_auction_enabled(auction_id, enabled).await {
            self.notifications
                .notify("Failed to update auction", NotificationKind::Error);
            return Err(e.into());
        }
        if let Err(e) = self.refresh_snapshot().await {
            warn!("refresh after update failed: {}", e);
        }
        Ok(())
    }

    /// End an auction early, awarding it to the current leader
    pub async fn declare_winner(&self, auction_id: AuctionId) -> Result<(), SessionError> {
        if let Err(e) = self.api.declare_winner(auction_id).await {
            self.notifications
                .notify("Failed to update auction", NotificationKind::Error);
            return Err(e.into());
        }
        self.notifications
            .notify("Winner declared", NotificationKind::Success);
        if let Err(e) = self.refresh_snapshot().await {
            warn!("refresh after update failed: {}", e);
        }
        Ok(())
    }

    // === Views ===

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn auctions(&self) -> Vec<Auction> {
        self.table.all()
    }

    pub fn auction(&self, id: AuctionId) -> Option<Auction> {
        self.table.get(id)
    }

    /// Lifecycle stage of one auction at the session clock's "now"
    pub fn status_for(&self, id: AuctionId) -> Option<AuctionStatus> {
        self.table.get(id).map(|a| a.status_at(self.clock.now()))
    }

    /// Remaining-time label for one auction
    pub fn time_left_for(&self, id: AuctionId) -> Option<String> {
        self.table
            .get(id)
            .map(|a| time_left(a.end_time, self.clock.now()))
    }

    /// Elapsed progress (0-100) for one auction
    pub fn progress_for(&self, id: AuctionId) -> Option<f64> {
        self.table
            .get(id)
            .map(|a| percent_elapsed(a.start_time, a.end_time, self.clock.now()))
    }

    pub fn notification_center(&self) -> Arc<NotificationCenter> {
        self.notifications.clone()
    }

    /// Live toasts, oldest first
    pub fn toasts(&self) -> Vec<gavel_core::Toast> {
        self.notifications.toasts()
    }
}

impl std::fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSession")
            .field("user_id", &self.identity.user_id)
            .field("role", &self.identity.role)
            .field("auctions", &self.table.len())
            .finish()
    }
}
