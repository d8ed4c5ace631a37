//! Update decision engine
//!
//! Compares a freshly computed value with the feed's last published value
//! and timestamp. One decision is made per run:
//!
//! ```text
//! feed missing                      -> CreateFeed
//! new == latest                     -> NoChange
//! latest == 0                       -> Publish
//! deviation >= threshold
//!   or elapsed >= heartbeat         -> Publish
//! otherwise                         -> BelowThreshold
//! ```

use crate::types::{DataFeedState, Numeric};
use num_traits::{Signed, Zero};

/// Basis points in 100%
const BASIS_POINTS: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Minimum relative change, in basis points
    pub deviation_bp: u32,
    /// Maximum age of the published value, in seconds
    pub heartbeat_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    CreateFeed,
    NoChange,
    BelowThreshold {
        deviation_bp: Numeric,
        elapsed_secs: u64,
    },
    Publish {
        data_feed_id: Numeric,
        value: Numeric,
    },
}

impl UpdateDecision {
    /// Whether the run should emit calls
    pub fn can_exec(&self) -> bool {
        matches!(self, UpdateDecision::CreateFeed | UpdateDecision::Publish { .. })
    }
}

/// `|new - latest| * 10000 / latest`, truncating
///
/// Callers guarantee `latest != 0`.
pub fn deviation_bp(new_value: &Numeric, latest_value: &Numeric) -> Numeric {
    ((new_value - latest_value) * Numeric::from(BASIS_POINTS) / latest_value).abs()
}

pub fn is_deviation_threshold_reached(
    new_value: &Numeric,
    latest_value: &Numeric,
    threshold_bp: u32,
) -> bool {
    deviation_bp(new_value, latest_value) >= Numeric::from(threshold_bp)
}

/// `now` is the evaluated chain's block time, not wall-clock time
pub fn is_heartbeat_threshold_reached(now: u64, latest_timestamp: u64, heartbeat_secs: u64) -> bool {
    now.saturating_sub(latest_timestamp) >= heartbeat_secs
}

/// Decide what to do with `new_value`
///
/// `feed` is `None` when no feed exists yet for the configuration; `now` is
/// only consulted when a threshold comparison is needed.
pub fn decide(
    new_value: &Numeric,
    feed: Option<&DataFeedState>,
    now: u64,
    thresholds: &Thresholds,
) -> UpdateDecision {
    let feed = match feed {
        Some(feed) => feed,
        None => return UpdateDecision::CreateFeed,
    };

    if *new_value == feed.latest_value {
        return UpdateDecision::NoChange;
    }

    let publish = UpdateDecision::Publish {
        data_feed_id: feed.id.clone(),
        value: new_value.clone(),
    };

    // Nothing meaningful to compare against yet
    if feed.latest_value.is_zero() {
        return publish;
    }

    let deviation = deviation_bp(new_value, &feed.latest_value);
    let elapsed_secs = now.saturating_sub(feed.latest_timestamp);

    log::info!(
        "📐 Deviation since latest update: {} bp (threshold {} bp)",
        deviation,
        thresholds.deviation_bp
    );
    log::info!(
        "⏱️  Time since latest update: {}s (heartbeat {}s)",
        elapsed_secs,
        thresholds.heartbeat_secs
    );

    if is_deviation_threshold_reached(new_value, &feed.latest_value, thresholds.deviation_bp)
        || is_heartbeat_threshold_reached(now, feed.latest_timestamp, thresholds.heartbeat_secs)
    {
        publish
    } else {
        UpdateDecision::BelowThreshold {
            deviation_bp: deviation,
            elapsed_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256};

    fn feed(latest_value: i64, latest_timestamp: u64) -> DataFeedState {
        DataFeedState {
            id: Numeric::from(7),
            latest_value: Numeric::from(latest_value),
            latest_timestamp,
            rules_hash: B256::ZERO,
            authorized_sender: Address::ZERO,
        }
    }

    const THRESHOLDS: Thresholds = Thresholds {
        deviation_bp: 200,
        heartbeat_secs: 3600,
    };

    fn publish(value: i64) -> UpdateDecision {
        UpdateDecision::Publish {
            data_feed_id: Numeric::from(7),
            value: Numeric::from(value),
        }
    }

    #[test]
    fn test_missing_feed_creates() {
        let decision = decide(&Numeric::from(100), None, 0, &THRESHOLDS);
        assert_eq!(decision, UpdateDecision::CreateFeed);
        assert!(decision.can_exec());
    }

    #[test]
    fn test_equal_value_is_no_change() {
        let decision = decide(&Numeric::from(100), Some(&feed(100, 0)), 1_000_000, &THRESHOLDS);
        assert_eq!(decision, UpdateDecision::NoChange);
        assert!(!decision.can_exec());
    }

    #[test]
    fn test_zero_baseline_always_publishes() {
        let latest = feed(0, 1_000);
        // No deviation possible to compute, heartbeat not reached either
        assert_eq!(
            decide(&Numeric::from(1), Some(&latest), 1_001, &THRESHOLDS),
            publish(1)
        );
        assert_eq!(
            decide(&Numeric::from(-5), Some(&latest), 1_000, &THRESHOLDS),
            publish(-5)
        );
    }

    #[test]
    fn test_small_move_within_heartbeat_is_below_threshold() {
        // 1% move against a 2% threshold, 10s after the last publish
        let decision = decide(&Numeric::from(101), Some(&feed(100, 1_000)), 1_010, &THRESHOLDS);
        assert_eq!(
            decision,
            UpdateDecision::BelowThreshold {
                deviation_bp: Numeric::from(100),
                elapsed_secs: 10,
            }
        );
    }

    #[test]
    fn test_heartbeat_forces_publish() {
        let decision = decide(&Numeric::from(101), Some(&feed(100, 1_000)), 5_000, &THRESHOLDS);
        assert_eq!(decision, publish(101));
        assert!(decision.can_exec());
    }

    #[test]
    fn test_deviation_forces_publish() {
        // Exactly at the threshold counts
        let decision = decide(&Numeric::from(102), Some(&feed(100, 1_000)), 1_010, &THRESHOLDS);
        assert_eq!(decision, publish(102));

        let decision = decide(&Numeric::from(90), Some(&feed(100, 1_000)), 1_010, &THRESHOLDS);
        assert_eq!(decision, publish(90));
    }

    #[test]
    fn test_deviation_truncates() {
        // 1.99% -> 199 bp
        assert_eq!(
            deviation_bp(&Numeric::from(10_199), &Numeric::from(10_000)),
            Numeric::from(199)
        );
        // Downward moves are absolute
        assert_eq!(
            deviation_bp(&Numeric::from(9_801), &Numeric::from(10_000)),
            Numeric::from(199)
        );
        assert!(!is_deviation_threshold_reached(
            &Numeric::from(10_199),
            &Numeric::from(10_000),
            200
        ));
    }

    #[test]
    fn test_heartbeat_boundaries() {
        assert!(is_heartbeat_threshold_reached(4_600, 1_000, 3_600));
        assert!(!is_heartbeat_threshold_reached(4_599, 1_000, 3_600));
        // Block clock behind the stored timestamp never underflows
        assert!(!is_heartbeat_threshold_reached(500, 1_000, 3_600));
    }

    #[test]
    fn test_decide_agrees_with_predicates_at_boundaries() {
        let latest = feed(10_000, 1_000);
        let cases = [
            (10_199, 1_010),
            (10_200, 1_010),
            (9_800, 1_010),
            (10_001, 4_599),
            (10_001, 4_600),
            (10_001, 500),
        ];

        for (value, now) in cases {
            let new_value = Numeric::from(value);
            let expected = is_deviation_threshold_reached(&new_value, &latest.latest_value, 200)
                || is_heartbeat_threshold_reached(now, latest.latest_timestamp, 3_600);
            let decision = decide(&new_value, Some(&latest), now, &THRESHOLDS);
            assert_eq!(decision.can_exec(), expected, "value {} at {}", value, now);
        }
    }
}
