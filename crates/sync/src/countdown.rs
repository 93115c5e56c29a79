//! Countdown Engine
//!
//! Per-auction remaining-time labels, elapsed-progress values, and one-shot
//! end-of-auction events. The label and progress functions are pure; the
//! engine itself only remembers which auctions already fired their end
//! event, so repeated ticks past expiry stay quiet.

use gavel_core::{Auction, AuctionId, Timestamp};
use std::collections::HashSet;

/// Human-readable remaining time until `end`
///
/// Resolution coarsens with distance: `"2d 5h 12m"` while days remain,
/// `"5h 12m 30s"` while hours remain, `"12m 30s"` below an hour, and
/// `"Ended"` at or past the end time.
pub fn time_left(end: Timestamp, now: Timestamp) -> String {
    let remaining = end - now;
    if remaining.num_seconds() <= 0 {
        return "Ended".to_string();
    }

    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;
    let seconds = remaining.num_seconds() % 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

/// Elapsed progress through the `[start, end]` window as a 0-100 percentage
///
/// 0 before the start, 100 at or after the end, linear in between.
/// Degenerate windows (end at or before start) read as fully elapsed once
/// `now` reaches them.
pub fn percent_elapsed(start: Timestamp, end: Timestamp, now: Timestamp) -> f64 {
    if now <= start {
        return 0.0;
    }
    if now >= end {
        return 100.0;
    }
    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// End-of-auction event emitted exactly once per auction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndedAuction {
    pub id: AuctionId,
    pub product_name: String,
}

/// Tracks which auctions have already fired their end event
///
/// Flags survive snapshot re-syncs: an auction that stays in the working
/// set past its end time fires once and stays silent through every later
/// tick. A flag is dropped only when its auction leaves the working set,
/// so the periodic re-fetch never re-announces an ended auction.
pub struct CountdownEngine {
    fired: HashSet<AuctionId>,
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self {
            fired: HashSet::new(),
        }
    }

    /// Scan the working set and collect auctions that just reached their
    /// end time; call once per second with the current reconciled view
    pub fn tick(&mut self, auctions: &[Auction], now: Timestamp) -> Vec<EndedAuction> {
        let mut ended = Vec::new();
        for auction in auctions {
            if auction.end_time <= now && self.fired.insert(auction.id) {
                ended.push(EndedAuction {
                    id: auction.id,
                    product_name: auction.product_name.clone(),
                });
            }
        }
        ended
    }

    /// Drop flags for auctions no longer in the working set; call when a
    /// snapshot replaces the collection
    pub fn prune(&mut self, auctions: &[Auction]) {
        let live: HashSet<AuctionId> = auctions.iter().map(|a| a.id).collect();
        self.fired.retain(|id| live.contains(id));
    }

    pub fn has_fired(&self, id: AuctionId) -> bool {
        self.fired.contains(&id)
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_label_with_days_remaining() {
        let now = Utc::now();
        let end = now + Duration::days(2) + Duration::hours(5) + Duration::minutes(12);
        assert_eq!(time_left(end, now), "2d 5h 12m");
    }

    #[test]
    fn test_label_with_hours_remaining() {
        let now = Utc::now();
        let end = now + Duration::hours(5) + Duration::minutes(12) + Duration::seconds(30);
        assert_eq!(time_left(end, now), "5h 12m 30s");
    }

    #[test]
    fn test_label_below_an_hour() {
        let now = Utc::now();
        let end = now + Duration::minutes(12) + Duration::seconds(30);
        assert_eq!(time_left(end, now), "12m 30s");

        let end = now + Duration::seconds(45);
        assert_eq!(time_left(end, now), "0m 45s");
    }

    #[test]
    fn test_label_at_and_past_end() {
        let now = Utc::now();
        assert_eq!(time_left(now, now), "Ended");
        assert_eq!(time_left(now - Duration::minutes(1), now), "Ended");
    }

    #[test]
    fn test_percent_elapsed_clamps_to_window() {
        let now = Utc::now();
        let start = now - Duration::minutes(30);
        let end = now + Duration::minutes(30);

        assert_eq!(percent_elapsed(start, end, start - Duration::hours(1)), 0.0);
        assert_eq!(percent_elapsed(start, end, end + Duration::hours(1)), 100.0);
        let mid = percent_elapsed(start, end, now);
        assert!((mid - 50.0).abs() < 0.01, "got {}", mid);
    }

    fn auction_ending(id: i64, end: Timestamp) -> Auction {
        Auction::new(
            id,
            format!("Lot {}", id),
            dec!(100),
            dec!(5),
            end - Duration::hours(2),
            end,
        )
    }

    #[test]
    fn test_end_event_fires_exactly_once() {
        let now = Utc::now();
        let auctions = vec![auction_ending(1, now - Duration::seconds(1))];
        let mut engine = CountdownEngine::new();

        let first = engine.tick(&auctions, now);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, 1);
        assert_eq!(first[0].product_name, "Lot 1");

        // Later ticks past expiry stay quiet
        assert!(engine.tick(&auctions, now + Duration::seconds(1)).is_empty());
        assert!(engine.tick(&auctions, now + Duration::minutes(5)).is_empty());
    }

    #[test]
    fn test_running_auctions_do_not_fire() {
        let now = Utc::now();
        let auctions = vec![
            auction_ending(1, now - Duration::seconds(1)),
            auction_ending(2, now + Duration::minutes(10)),
        ];
        let mut engine = CountdownEngine::new();

        let ended = engine.tick(&auctions, now);
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].id, 1);
        assert!(!engine.has_fired(2));
    }

    #[test]
    fn test_prune_keeps_flags_for_surviving_auctions() {
        let now = Utc::now();
        let auctions = vec![auction_ending(1, now)];
        let mut engine = CountdownEngine::new();

        assert_eq!(engine.tick(&auctions, now).len(), 1);

        // A re-sync that still contains the auction must not re-fire it
        engine.prune(&auctions);
        assert!(engine.has_fired(1));
        assert!(engine.tick(&auctions, now).is_empty());
    }

    #[test]
    fn test_prune_drops_flags_for_departed_auctions() {
        let now = Utc::now();
        let auctions = vec![auction_ending(1, now)];
        let mut engine = CountdownEngine::new();

        assert_eq!(engine.tick(&auctions, now).len(), 1);

        engine.prune(&[]);
        assert!(!engine.has_fired(1));
        // If the auction returns in a later snapshot it may fire again
        assert_eq!(engine.tick(&auctions, now).len(), 1);
    }
}
