//! Turn update decisions into the run's result

use crate::decision::{decide, Thresholds, UpdateDecision};
use crate::error::MashupError;
use crate::ledger::abi::{create_data_feed_call, update_value_call};
use crate::ledger::OracleLedger;
use crate::types::{DataFeedState, ExecResult, Numeric};
use alloy_primitives::{Address, B256};
use chrono::{TimeZone, Utc};
use num_traits::Zero;

pub const NOT_CHANGED: &str = "The oracle value has not changed";
pub const THRESHOLDS_NOT_REACHED: &str = "Heartbeat and deviation thresholds not reached";

/// Oracle plus the identity a new feed would be created with
#[derive(Debug, Clone, Copy)]
pub struct FeedTarget<'a> {
    pub oracle: Address,
    pub label: &'a str,
    pub rules_hash: B256,
}

/// Turn a decision into the run's result
pub fn emit(decision: UpdateDecision, target: &FeedTarget<'_>) -> Result<ExecResult, MashupError> {
    match decision {
        UpdateDecision::CreateFeed => {
            log::info!("🆕 Creating new data feed: {}", target.label);
            Ok(ExecResult::exec(vec![create_data_feed_call(
                target.oracle,
                target.label,
                target.rules_hash,
            )]))
        }
        UpdateDecision::NoChange => {
            log::info!("💤 {}", NOT_CHANGED);
            Ok(ExecResult::skip(NOT_CHANGED))
        }
        UpdateDecision::BelowThreshold { .. } => {
            log::info!("💤 {}", THRESHOLDS_NOT_REACHED);
            Ok(ExecResult::skip(THRESHOLDS_NOT_REACHED))
        }
        UpdateDecision::Publish { data_feed_id, value } => {
            log::info!("✅ Updating destination oracle value to: {}", value);
            let call = update_value_call(target.oracle, &data_feed_id, &value)?;
            Ok(ExecResult::exec(vec![call]))
        }
    }
}

/// Compare `new_value` with the feed and build the update call if warranted
///
/// Block time is only read when a threshold comparison is actually needed.
pub async fn settle<L: OracleLedger + ?Sized>(
    ledger: &L,
    target: &FeedTarget<'_>,
    feed: &DataFeedState,
    new_value: &Numeric,
    thresholds: &Thresholds,
) -> Result<ExecResult, MashupError> {
    log::info!("📈 Latest value in the oracle: {}", feed.latest_value);
    if let Some(updated_at) = Utc.timestamp_opt(feed.latest_timestamp as i64, 0).single() {
        log::info!("🕐 Latest update at {}", updated_at.to_rfc3339());
    }

    let now = if *new_value != feed.latest_value && !feed.latest_value.is_zero() {
        ledger.block_timestamp().await?
    } else {
        feed.latest_timestamp
    };

    emit(decide(new_value, Some(feed), now, thresholds), target)
}
