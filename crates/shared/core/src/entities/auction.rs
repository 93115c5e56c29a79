use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuctionStatus;
use crate::values::{AuctionId, Price, Timestamp, UserId};

/// A timed listing, as reconciled from server snapshots and push deltas
///
/// Field names follow the server's camelCase JSON. `current_bid` is
/// monotonically non-decreasing over the auction's lifetime; the reconciler
/// enforces that invariant on merge, this type only stores the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: AuctionId,
    pub product_name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub condition: Option<String>,
    pub starting_price: Price,
    /// Highest observed bid; absent until the first bid lands
    #[serde(default)]
    pub current_bid: Option<Price>,
    pub min_increment: Price,
    #[serde(default)]
    pub buy_now_price: Option<Price>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub enabled: bool,
    /// Explicit server-provided stage; overrides time derivation when present
    #[serde(default)]
    pub status: Option<AuctionStatus>,
    #[serde(default)]
    pub bid_count: u32,
    /// Weak back-reference to the leading bidder, never owned
    #[serde(default)]
    pub highest_bidder: Option<UserId>,
    #[serde(default)]
    pub last_bid_at: Option<Timestamp>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Auction {
    /// Create a minimal listing; remaining fields take their empty defaults
    pub fn new(
        id: AuctionId,
        product_name: impl Into<String>,
        starting_price: Price,
        min_increment: Price,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product_name: product_name.into(),
            category: None,
            condition: None,
            starting_price,
            current_bid: None,
            min_increment,
            buy_now_price: None,
            start_time,
            end_time,
            enabled: true,
            status: None,
            bid_count: 0,
            highest_bidder: None,
            last_bid_at: None,
            image_url: None,
        }
    }

    /// Price a new bid must beat: the current bid, or the starting price
    /// while no bid has landed yet
    pub fn highest_bid(&self) -> Price {
        self.current_bid.unwrap_or(self.starting_price)
    }

    /// Category label with the display fallback applied
    pub fn category(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }

    /// Condition label with the display fallback applied
    pub fn condition(&self) -> &str {
        self.condition.as_deref().unwrap_or("Unknown")
    }

    /// Derive the lifecycle stage at `now`
    ///
    /// Rules are evaluated top to bottom; the first match wins:
    /// 1. an explicit server status (the server may end an auction early in
    ///    a way local timestamps cannot show, so it always takes precedence)
    /// 2. disabled and before the start time -> Draft
    /// 3. before the start time -> Scheduled
    /// 4. within [start, end] -> Live
    /// 5. otherwise -> Ended
    pub fn status_at(&self, now: Timestamp) -> AuctionStatus {
        if let Some(status) = self.status {
            return status;
        }
        if !self.enabled && now < self.start_time {
            return AuctionStatus::Draft;
        }
        if now < self.start_time {
            return AuctionStatus::Scheduled;
        }
        if now <= self.end_time {
            return AuctionStatus::Live;
        }
        AuctionStatus::Ended
    }

    /// Basic structural validity: positive prices, a non-empty time window
    pub fn validate(&self) -> bool {
        self.starting_price > Decimal::ZERO
            && self.min_increment > Decimal::ZERO
            && self.end_time > self.start_time
            && self
                .current_bid
                .map(|bid| bid >= self.starting_price)
                .unwrap_or(true)
    }
}
