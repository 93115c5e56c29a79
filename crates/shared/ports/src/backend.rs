use async_trait::async_trait;

use crate::error::ApiResult;
use gavel_core::{Auction, AuctionId, Bid, Notification, NotificationId, Price};

/// Port for the REST-shaped backend collaborator
///
/// The sync engine consumes point-in-time snapshots and issues one-shot
/// commands through this trait. It does not own transport framing or
/// retries for these calls; only the persistent push channel has retry
/// behavior (see the gateway crate).
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// Auctions currently visible to every bidder
    async fn live_auctions(&self) -> ApiResult<Vec<Auction>>;

    /// Auctions owned by the current user (seller view)
    async fn my_auctions(&self) -> ApiResult<Vec<Auction>>;

    async fn auction(&self, id: AuctionId) -> ApiResult<Auction>;

    /// Bid history for one auction, newest last
    async fn auction_bids(&self, id: AuctionId) -> ApiResult<Vec<Bid>>;

    /// Persisted notifications for the current user
    async fn my_notifications(&self) -> ApiResult<Vec<Notification>>;

    /// Place a bid; `ApiError::Conflict` means a higher bid won the race
    async fn place_bid(&self, auction_id: AuctionId, amount: Price) -> ApiResult<()>;

    /// Acknowledge a persisted notification's read flag
    async fn set_notification_read(&self, id: NotificationId, read: bool) -> ApiResult<()>;

    /// Enable or disable a listing (seller command)
    async fn set_auction_enabled(&self, id: AuctionId, enabled: bool) -> ApiResult<()>;

    /// End an auction early and declare the current leader the winner
    async fn declare_winner(&self, id: AuctionId) -> ApiResult<()>;
}
