//! Topic naming

use gavel_core::{AuctionId, UserId};

/// Topic names for logical message routing
///
/// Even with in-process channels we keep the server's topic scheme so the
/// registry, logging, and a future networked transport all speak the same
/// names.
pub struct Topics;

impl Topics {
    // Inbound (server -> client)

    /// Delta stream for one auction: `auction/42`
    pub fn auction(id: AuctionId) -> String {
        format!("auction/{}", id)
    }

    /// Push notifications for one user: `user/7/notifications`
    pub fn user_notifications(user_id: UserId) -> String {
        format!("user/{}/notifications", user_id)
    }

    // Outbound (client -> server)

    /// Fire-and-forget bid submission
    pub const BID_SUBMIT: &'static str = "app/bid";
}
