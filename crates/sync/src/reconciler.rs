//! Canonical Auction Collection
//!
//! Merges periodic full snapshots and asynchronous push deltas into one
//! id-indexed table. The merge rules make reconciliation order-independent
//! and idempotent, because the transport guarantees neither ordering across
//! topics nor exactly-once delivery:
//! - `current_bid` only ever moves up (monotonic maximum)
//! - a delta for an id not in the table is discarded; the record will
//!   arrive with the next snapshot instead
//! - snapshots are authoritative and are the only way records are removed
//!
//! Each merge locks a single record, so concurrent readers observe either
//! the pre- or post-update state, never a half-applied delta.

use dashmap::DashMap;
use gavel_core::{Auction, AuctionId, AuctionStatus, Price, UserId};
use gavel_gateway::AuctionDelta;
use log::{debug, warn};

/// What a successfully merged delta contained, for notification fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeltaApplied {
    /// The delta carried a price (even one clamped by monotonicity)
    pub price_observed: bool,
    /// The delta moved the auction to an explicit Ended status
    pub ended: bool,
    /// Leading bidder after the merge
    pub highest_bidder: Option<UserId>,
}

/// Result of [`AuctionTable::apply_delta`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOutcome {
    Applied(DeltaApplied),
    /// The referenced auction is not in the canonical set; delta discarded
    Unknown,
}

/// Id-indexed canonical auction collection
///
/// Sole writer of reconciled auction state. Readers get owned clones;
/// nothing outside this type mutates a record.
pub struct AuctionTable {
    auctions: DashMap<AuctionId, Auction>,
}

impl AuctionTable {
    pub fn new() -> Self {
        Self {
            auctions: DashMap::new(),
        }
    }

    /// Replace the canonical collection with an authoritative snapshot
    ///
    /// Used for the initial load and the periodic re-sync. This is the only
    /// operation that removes records. Structurally invalid records are
    /// dropped rather than admitted into the working set.
    pub fn apply_snapshot(&self, auctions: Vec<Auction>) {
        self.auctions.clear();
        for auction in auctions {
            if !auction.validate() {
                warn!("auction {} failed validation, dropped from snapshot", auction.id);
                continue;
            }
            self.auctions.insert(auction.id, auction);
        }
    }

    /// Merge a partial update into the matching record
    ///
    /// Absent fields are left unchanged. A `current_bid` at or below the
    /// cached value is clamped (kept at the cached maximum) - expected under
    /// out-of-order delivery, never surfaced to the user.
    pub fn apply_delta(&self, id: AuctionId, delta: &AuctionDelta) -> DeltaOutcome {
        let Some(mut auction) = self.auctions.get_mut(&id) else {
            debug!("delta for unknown auction {} discarded", id);
            return DeltaOutcome::Unknown;
        };

        if let Some(bid) = delta.current_bid {
            if bid > auction.highest_bid() {
                auction.current_bid = Some(bid);
            } else {
                debug!(
                    "stale price {} for auction {} clamped at {}",
                    bid,
                    id,
                    auction.highest_bid()
                );
            }
        }
        if let Some(count) = delta.bid_count {
            auction.bid_count = count;
        }
        if let Some(bid_time) = delta.bid_time {
            auction.last_bid_at = Some(bid_time);
        }
        if let Some(end_time) = delta.end_time {
            auction.end_time = end_time;
        }
        if let Some(status) = delta.status {
            auction.status = Some(status);
        }
        if let Some(bidder) = delta.highest_bidder_id {
            auction.highest_bidder = Some(bidder);
        }

        DeltaOutcome::Applied(DeltaApplied {
            price_observed: delta.current_bid.is_some(),
            ended: delta.status == Some(AuctionStatus::Ended),
            highest_bidder: auction.highest_bidder,
        })
    }

    // === Read-only views ===

    /// Owned copy of one record
    pub fn get(&self, id: AuctionId) -> Option<Auction> {
        self.auctions.get(&id).map(|a| a.clone())
    }

    /// Owned copy of the whole collection, in no particular order
    pub fn all(&self) -> Vec<Auction> {
        self.auctions.iter().map(|a| a.clone()).collect()
    }

    /// Ids currently in the canonical set
    pub fn ids(&self) -> Vec<AuctionId> {
        self.auctions.iter().map(|a| *a.key()).collect()
    }

    /// Price a new bid on `id` must beat
    pub fn highest_bid(&self, id: AuctionId) -> Option<Price> {
        self.auctions.get(&id).map(|a| a.highest_bid())
    }

    pub fn contains(&self, id: AuctionId) -> bool {
        self.auctions.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.auctions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auctions.is_empty()
    }
}

impl Default for AuctionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    fn sample_snapshot() -> Vec<Auction> {
        let now = Utc::now();
        vec![
            Auction::new(
                1,
                "Vintage camera",
                dec!(100),
                dec!(5),
                now - Duration::hours(1),
                now + Duration::hours(1),
            ),
            Auction::new(
                2,
                "Mechanical watch",
                dec!(250),
                dec!(10),
                now - Duration::hours(1),
                now + Duration::hours(2),
            ),
        ]
    }

    #[test]
    fn test_snapshot_replaces_collection() {
        let table = AuctionTable::new();
        table.apply_snapshot(sample_snapshot());
        assert_eq!(table.len(), 2);

        // A new snapshot without auction 2 removes it
        let survivor = sample_snapshot().remove(0);
        table.apply_snapshot(vec![survivor]);
        assert_eq!(table.len(), 1);
        assert!(table.contains(1));
        assert!(!table.contains(2));
    }

    #[test]
    fn test_invalid_snapshot_records_are_dropped() {
        let table = AuctionTable::new();
        let mut snapshot = sample_snapshot();
        // End before start makes the record structurally invalid
        snapshot[1].end_time = snapshot[1].start_time - Duration::hours(1);

        table.apply_snapshot(snapshot);
        assert_eq!(table.len(), 1);
        assert!(table.contains(1));
        assert!(!table.contains(2));
    }

    #[test]
    fn test_delta_merges_field_by_field() {
        let table = AuctionTable::new();
        table.apply_snapshot(sample_snapshot());

        let bid_time = Utc::now();
        let outcome = table.apply_delta(1, &AuctionDelta::bid(dec!(150), 1, bid_time));
        assert_eq!(
            outcome,
            DeltaOutcome::Applied(DeltaApplied {
                price_observed: true,
                ended: false,
                highest_bidder: None,
            })
        );

        let auction = table.get(1).unwrap();
        assert_eq!(auction.current_bid, Some(dec!(150)));
        assert_eq!(auction.bid_count, 1);
        assert_eq!(auction.last_bid_at, Some(bid_time));
        // Fields absent from the delta are untouched
        assert_eq!(auction.starting_price, dec!(100));
        assert_eq!(auction.status, None);
    }

    #[test]
    fn test_stale_price_is_clamped() {
        let table = AuctionTable::new();
        table.apply_snapshot(sample_snapshot());

        table.apply_delta(1, &AuctionDelta::bid(dec!(150), 1, Utc::now()));
        let outcome = table.apply_delta(1, &AuctionDelta::bid(dec!(120), 2, Utc::now()));

        // Still reported as observed, but the canonical price holds
        assert!(matches!(
            outcome,
            DeltaOutcome::Applied(DeltaApplied { price_observed: true, .. })
        ));
        assert_eq!(table.get(1).unwrap().current_bid, Some(dec!(150)));
        assert_eq!(table.highest_bid(1), Some(dec!(150)));
        // Non-price fields from the stale delta still apply
        assert_eq!(table.get(1).unwrap().bid_count, 2);
    }

    #[test]
    fn test_price_below_starting_price_is_rejected() {
        let table = AuctionTable::new();
        table.apply_snapshot(sample_snapshot());

        // No bids yet: the floor is the starting price
        table.apply_delta(1, &AuctionDelta::bid(dec!(80), 1, Utc::now()));
        assert_eq!(table.get(1).unwrap().current_bid, None);
    }

    #[test]
    fn test_final_price_is_max_under_any_delivery_order() {
        let prices = [dec!(150), dec!(110), dec!(175), dec!(120), dec!(160)];

        // Forward, reverse, and an interleaved order all converge
        for order in [[0usize, 1, 2, 3, 4], [4, 3, 2, 1, 0], [1, 3, 0, 4, 2]] {
            let table = AuctionTable::new();
            table.apply_snapshot(sample_snapshot());
            for (count, idx) in order.into_iter().enumerate() {
                table.apply_delta(
                    1,
                    &AuctionDelta::bid(prices[idx], count as u32, Utc::now()),
                );
            }
            assert_eq!(table.get(1).unwrap().current_bid, Some(dec!(175)));
        }
    }

    #[test]
    fn test_duplicate_delta_is_idempotent() {
        let table = AuctionTable::new();
        table.apply_snapshot(sample_snapshot());

        let delta = AuctionDelta::bid(dec!(150), 1, Utc::now());
        table.apply_delta(1, &delta);
        table.apply_delta(1, &delta);

        let auction = table.get(1).unwrap();
        assert_eq!(auction.current_bid, Some(dec!(150)));
        assert_eq!(auction.bid_count, 1);
    }

    #[test]
    fn test_unknown_id_leaves_collection_unchanged() {
        let table = AuctionTable::new();
        table.apply_snapshot(sample_snapshot());

        let outcome = table.apply_delta(99, &AuctionDelta::bid(dec!(500), 1, Utc::now()));
        assert_eq!(outcome, DeltaOutcome::Unknown);
        assert_eq!(table.len(), 2);
        assert!(!table.contains(99));
    }

    #[test]
    fn test_ended_delta_reports_winner() {
        let table = AuctionTable::new();
        table.apply_snapshot(sample_snapshot());

        table.apply_delta(1, &AuctionDelta::bid(dec!(150), 1, Utc::now()));
        let outcome = table.apply_delta(1, &AuctionDelta::ended(Some(42)));

        assert_eq!(
            outcome,
            DeltaOutcome::Applied(DeltaApplied {
                price_observed: false,
                ended: true,
                highest_bidder: Some(42),
            })
        );
        let auction = table.get(1).unwrap();
        assert_eq!(auction.status, Some(AuctionStatus::Ended));
        assert_eq!(auction.highest_bidder, Some(42));
    }
}
