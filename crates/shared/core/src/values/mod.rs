use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Money value - uses Decimal for precision
/// Future: could become a newtype with currency awareness
pub type Price = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Server-assigned auction identifier
pub type AuctionId = i64;

/// Server-assigned user identifier
pub type UserId = i64;

/// Server-assigned bid identifier
pub type BidId = i64;

/// Server-assigned identifier of a persisted notification
pub type NotificationId = i64;

/// Locally generated identifier of an ephemeral toast
pub type ToastId = Uuid;
