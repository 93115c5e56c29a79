//! Gavel Sync
//!
//! Canonical in-memory auction state. The [`AuctionTable`] is the single
//! owner and sole writer of the reconciled collection; everything else
//! (status derivation, countdowns, bid admission, rendering) reads from it.
//! The [`CountdownEngine`] turns the table's end times into per-second
//! labels and one-shot end events.

pub mod countdown;
pub mod reconciler;

pub use countdown::{percent_elapsed, time_left, CountdownEngine, EndedAuction};
pub use reconciler::{AuctionTable, DeltaApplied, DeltaOutcome};
