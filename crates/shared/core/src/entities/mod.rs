mod auction;
mod bid;
mod notification;
mod status;

pub use auction::Auction;
pub use bid::Bid;
pub use notification::{Notification, NotificationKind, Toast};
pub use status::AuctionStatus;
