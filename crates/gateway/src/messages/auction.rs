//! Auction topic messages

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;
use crate::transport::Payload;
use gavel_core::{AuctionId, AuctionStatus, Price, Timestamp, UserId};

/// Partial update to one auction's mutable fields
///
/// Delivered on `auction/{id}`; the auction id is carried by the topic, not
/// the payload. Any absent field leaves the cached value unchanged. The
/// reconciler owns the merge rules (monotonic price, ignore unknown ids).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionDelta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bid: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bid_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AuctionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_bidder_id: Option<UserId>,
}

impl AuctionDelta {
    /// Delta for a newly accepted bid
    pub fn bid(current_bid: Price, bid_count: u32, bid_time: Timestamp) -> Self {
        Self {
            current_bid: Some(current_bid),
            bid_count: Some(bid_count),
            bid_time: Some(bid_time),
            ..Self::default()
        }
    }

    /// Delta for an auction the server ended early
    pub fn ended(highest_bidder_id: Option<UserId>) -> Self {
        Self {
            status: Some(AuctionStatus::Ended),
            highest_bidder_id,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Parse a raw frame from the `auction/{id}` topic
    pub fn from_payload(payload: Payload) -> Result<Self, GatewayError> {
        Ok(serde_json::from_value(payload)?)
    }
}

/// Fire-and-forget bid submission on the push channel
///
/// Sent on `app/bid` in addition to the REST call; the server answers via
/// the auction's topic, never via a reply to this command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidCommand {
    pub auction_id: AuctionId,
    pub amount: Price,
}

impl BidCommand {
    pub fn new(auction_id: AuctionId, amount: Price) -> Self {
        Self { auction_id, amount }
    }

    pub fn to_payload(&self) -> Payload {
        serde_json::to_value(self).unwrap_or(Payload::Null)
    }
}
