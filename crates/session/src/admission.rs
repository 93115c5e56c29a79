//! Client-side bid admission
//!
//! Every bid passes these checks before any network call is made. A
//! rejection here produces no toast and no request; the caller surfaces
//! the reason through its own error path. Passing admission is not a
//! guarantee of acceptance: the server holds newer state and may still
//! answer with a conflict.

use crate::identity::{Role, SessionIdentity};
use gavel_core::{Auction, AuctionStatus, Price, Timestamp};
use thiserror::Error;

/// Why a bid was refused locally
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BidRejection {
    #[error("not signed in")]
    NotAuthenticated,

    #[error("{0} accounts cannot place bids")]
    RoleForbidden(Role),

    #[error("auction is not accepting bids (currently {0})")]
    NotLive(AuctionStatus),

    #[error("bid must exceed the current highest bid of {floor}")]
    TooLow { floor: Price },
}

/// Admission check against the locally reconciled view
///
/// Only an authenticated bidder gets past the identity checks. The floor
/// is the current bid, or the starting price while no bid has landed; the
/// amount must strictly exceed it. Liveness comes from the same status
/// derivation the rest of the client renders, so a bid the user can see
/// as placeable is also admissible.
pub fn check_bid(
    identity: &SessionIdentity,
    auction: &Auction,
    amount: Price,
    now: Timestamp,
) -> Result<(), BidRejection> {
    if !identity.is_authenticated() {
        return Err(BidRejection::NotAuthenticated);
    }
    if !identity.role.can_place_bids() {
        return Err(BidRejection::RoleForbidden(identity.role));
    }
    let status = auction.status_at(now);
    if status != AuctionStatus::Live {
        return Err(BidRejection::NotLive(status));
    }
    let floor = auction.highest_bid();
    if amount <= floor {
        return Err(BidRejection::TooLow { floor });
    }
    Ok(())
}
