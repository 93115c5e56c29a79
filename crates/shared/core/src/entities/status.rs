use serde::{Deserialize, Serialize};
use std::fmt;

/// Auction lifecycle stage
///
/// Either provided explicitly by the server (wire form is UPPERCASE) or
/// derived from the auction's flags and timestamps. See
/// [`Auction::status_at`](super::Auction::status_at) for the derivation
/// rules and their precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuctionStatus {
    /// Listing exists but is not yet enabled for bidding
    Draft,
    /// Enabled, waiting for the start time
    Scheduled,
    /// Open for bids
    Live,
    /// Past the end time, or ended early by the server
    Ended,
}

impl AuctionStatus {
    /// Returns true if bids can be admitted in this stage
    pub fn is_live(&self) -> bool {
        matches!(self, AuctionStatus::Live)
    }

    /// Returns true if the auction can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, AuctionStatus::Ended)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Draft => "Draft",
            AuctionStatus::Scheduled => "Scheduled",
            AuctionStatus::Live => "Live",
            AuctionStatus::Ended => "Ended",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
