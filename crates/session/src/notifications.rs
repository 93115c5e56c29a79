//! Dual-lifetime notification state
//!
//! Two populations live here and never mix:
//! - toasts: created locally, shown, and removed after a fixed delay
//! - persisted notifications: fetched from the server once per session,
//!   kept until the user marks them read; never auto-expired
//!
//! A push frame and a history record describing the same occurrence stay
//! two separate objects with independent lifetimes.

use dashmap::DashMap;
use gavel_core::{Notification, NotificationId, NotificationKind, Toast, ToastId};
use gavel_ports::{ApiResult, BackendApi, Clock};
use log::{debug, warn};
use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(5);

/// Owns both notification populations for one session
pub struct NotificationCenter {
    /// Self-handle for expiry tasks; never upgraded past the center's life
    weak: Weak<NotificationCenter>,
    clock: Arc<dyn Clock>,
    toast_ttl: Duration,
    toasts: DashMap<ToastId, Toast>,
    /// Expiry task per live toast, aborted on dismiss or shutdown
    expiries: DashMap<ToastId, JoinHandle<()>>,
    persisted: RwLock<Vec<Notification>>,
}

impl NotificationCenter {
    pub fn new(clock: Arc<dyn Clock>) -> Arc<Self> {
        Self::with_toast_ttl(clock, DEFAULT_TOAST_TTL)
    }

    pub fn with_toast_ttl(clock: Arc<dyn Clock>, toast_ttl: Duration) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            clock,
            toast_ttl,
            toasts: DashMap::new(),
            expiries: DashMap::new(),
            persisted: RwLock::new(Vec::new()),
        })
    }

    // === Ephemeral lifecycle ===

    /// Show a toast and schedule its removal after the fixed delay
    ///
    /// Must run inside a tokio runtime; the expiry task holds a weak
    /// reference so a dropped center does not keep sleepers alive.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> Toast {
        let toast = Toast::new(message, kind, self.clock.now());
        let id = toast.id;
        self.toasts.insert(id, toast.clone());

        let center = self.weak.clone();
        let ttl = self.toast_ttl;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(center) = center.upgrade() {
                center.toasts.remove(&id);
                center.expiries.remove(&id);
            }
        });
        self.expiries.insert(id, handle);
        toast
    }

    /// Remove a toast before its timer fires (user clicked it away)
    pub fn dismiss(&self, id: ToastId) {
        self.toasts.remove(&id);
        if let Some((_, handle)) = self.expiries.remove(&id) {
            handle.abort();
        }
    }

    /// Live toasts, oldest first
    pub fn toasts(&self) -> Vec<Toast> {
        let mut toasts: Vec<Toast> = self.toasts.iter().map(|t| t.clone()).collect();
        toasts.sort_by_key(|t| t.time);
        toasts
    }

    // === Persisted lifecycle ===

    /// Hydrate the persisted list from the notification history endpoint
    pub async fn load_persisted(&self, api: &dyn BackendApi) -> ApiResult<usize> {
        let history = api.my_notifications().await?;
        let count = history.len();
        debug!("loaded {} persisted notifications", count);
        *self.persisted.write().expect("notification lock poisoned") = history;
        Ok(count)
    }

    /// Mark a persisted notification read, locally first
    ///
    /// The server acknowledgement is fire-and-forget; if it fails the
    /// local flag stands and the record simply comes back unread next
    /// session. Returns false when the id is not in the loaded history.
    pub fn mark_read(&self, api: Arc<dyn BackendApi>, id: NotificationId) -> bool {
        {
            let mut history = self.persisted.write().expect("notification lock poisoned");
            let Some(notification) = history.iter_mut().find(|n| n.id == id) else {
                return false;
            };
            if notification.read {
                return true;
            }
            notification.read = true;
        }

        tokio::spawn(async move {
            if let Err(e) = api.set_notification_read(id, true).await {
                warn!("read acknowledgement for notification {} failed: {}", id, e);
            }
        });
        true
    }

    /// Persisted notifications in server order
    pub fn persisted(&self) -> Vec<Notification> {
        self.persisted
            .read()
            .expect("notification lock poisoned")
            .clone()
    }

    pub fn unread_count(&self) -> usize {
        self.persisted
            .read()
            .expect("notification lock poisoned")
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// Drop every live toast and abort pending expiry timers
    pub fn shutdown(&self) {
        self.expiries.retain(|_, handle| {
            handle.abort();
            false
        });
        self.toasts.clear();
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gavel_clock::SystemClock;
    use gavel_core::{Auction, AuctionId, Bid, Price};
    use gavel_ports::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubApi {
        notifications: ApiResult<Vec<Notification>>,
        ack_result: ApiResult<()>,
        ack_calls: AtomicUsize,
    }

    impl StubApi {
        fn with_history(notifications: Vec<Notification>) -> Self {
            Self {
                notifications: Ok(notifications),
                ack_result: Ok(()),
                ack_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BackendApi for StubApi {
        async fn live_auctions(&self) -> ApiResult<Vec<Auction>> {
            Ok(Vec::new())
        }
        async fn my_auctions(&self) -> ApiResult<Vec<Auction>> {
            Ok(Vec::new())
        }
        async fn auction(&self, _id: AuctionId) -> ApiResult<Auction> {
            Err(ApiError::Status(404))
        }
        async fn auction_bids(&self, _id: AuctionId) -> ApiResult<Vec<Bid>> {
            Ok(Vec::new())
        }
        async fn my_notifications(&self) -> ApiResult<Vec<Notification>> {
            self.notifications.clone()
        }
        async fn place_bid(&self, _auction_id: AuctionId, _amount: Price) -> ApiResult<()> {
            Ok(())
        }
        async fn set_notification_read(&self, _id: NotificationId, _read: bool) -> ApiResult<()> {
            self.ack_calls.fetch_add(1, Ordering::SeqCst);
            self.ack_result.clone()
        }
        async fn set_auction_enabled(&self, _id: AuctionId, _enabled: bool) -> ApiResult<()> {
            Ok(())
        }
        async fn declare_winner(&self, _id: AuctionId) -> ApiResult<()> {
            Ok(())
        }
    }

    fn center() -> Arc<NotificationCenter> {
        NotificationCenter::new(Arc::new(SystemClock::new()))
    }

    fn history_record(id: NotificationId, read: bool) -> Notification {
        Notification {
            id,
            message: format!("Outbid on lot {}", id),
            kind: NotificationKind::Info,
            created_at: None,
            read,
        }
    }

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_fixed_delay() {
        let center = center();
        center.notify("Bid placed successfully!", NotificationKind::Success);
        settle().await; // expiry timer registers at t0
        assert_eq!(center.toasts().len(), 1);

        tokio::time::advance(Duration::from_millis(4900)).await;
        settle().await;
        assert_eq!(center.toasts().len(), 1);

        tokio::time::advance(Duration::from_millis(200)).await;
        settle().await;
        assert!(center.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_expire_independently() {
        let center = center();
        center.notify("New highest bid placed", NotificationKind::Info);
        settle().await;

        tokio::time::advance(Duration::from_secs(3)).await;
        center.notify("Auction ended", NotificationKind::Warning);
        settle().await;
        assert_eq!(center.toasts().len(), 2);

        // First toast is past its delay, the second is not
        tokio::time::advance(Duration::from_millis(2100)).await;
        settle().await;
        let remaining = center.toasts();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].message, "Auction ended");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_removes_immediately() {
        let center = center();
        let toast = center.notify("New highest bid placed", NotificationKind::Info);
        center.dismiss(toast.id);
        assert!(center.toasts().is_empty());
        assert!(center.expiries.is_empty());
    }

    #[tokio::test]
    async fn test_load_persisted_failure_leaves_history_empty() {
        let center = center();
        let api = StubApi {
            notifications: Err(ApiError::Status(500)),
            ack_result: Ok(()),
            ack_calls: AtomicUsize::new(0),
        };

        assert!(center.load_persisted(&api).await.is_err());
        assert!(center.persisted().is_empty());
        assert_eq!(center.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_survives_failed_acknowledgement() {
        let center = center();
        let api = Arc::new(StubApi {
            notifications: Ok(vec![history_record(1, false), history_record(2, false)]),
            ack_result: Err(ApiError::Status(500)),
            ack_calls: AtomicUsize::new(0),
        });

        center.load_persisted(api.as_ref()).await.unwrap();
        assert_eq!(center.unread_count(), 2);

        assert!(center.mark_read(api.clone(), 1));
        settle().await;

        // Local flag stands even though the server rejected the ack
        assert_eq!(api.ack_calls.load(Ordering::SeqCst), 1);
        assert_eq!(center.unread_count(), 1);
        assert!(center.persisted().iter().any(|n| n.id == 1 && n.read));
    }

    #[tokio::test]
    async fn test_mark_read_of_read_record_skips_the_ack() {
        let center = center();
        let api = Arc::new(StubApi::with_history(vec![history_record(1, true)]));

        center.load_persisted(api.as_ref()).await.unwrap();
        assert!(center.mark_read(api.clone(), 1));
        assert!(!center.mark_read(api.clone(), 99));
        settle().await;

        assert_eq!(api.ack_calls.load(Ordering::SeqCst), 0);
    }
}
