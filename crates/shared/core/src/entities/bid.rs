use serde::{Deserialize, Serialize};

use crate::values::{AuctionId, BidId, Price, Timestamp, UserId};

/// A single observed bid
///
/// Immutable once observed; used for history and analytics display only.
/// The reconciled price lives on [`Auction`](super::Auction), not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    /// Reference to the auction, not owning
    pub auction_id: AuctionId,
    pub bidder_id: UserId,
    pub amount: Price,
    pub bid_time: Timestamp,
}

impl Bid {
    pub fn new(
        id: BidId,
        auction_id: AuctionId,
        bidder_id: UserId,
        amount: Price,
        bid_time: Timestamp,
    ) -> Self {
        Self {
            id,
            auction_id,
            bidder_id,
            amount,
            bid_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bid_wire_shape() {
        let bid = Bid::new(7, 1, 42, dec!(150), Utc::now());
        let json = serde_json::to_value(&bid).unwrap();
        assert_eq!(json["auctionId"], 1);
        assert_eq!(json["bidderId"], 42);
    }
}
