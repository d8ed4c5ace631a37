//! Feed identity: rules hash and feed lookup
//!
//! A feed is keyed by `(rules_hash, authorized_sender)`. The rules hash
//! covers every run argument except `nickname`, so renaming a feed never
//! forks it while any other change does.

use crate::ledger::{LedgerError, OracleLedger};
use crate::types::DataFeedState;
use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::SolValue;
use serde_json::{Map, Value};

/// Argument key excluded from the rules hash
pub const NICKNAME_KEY: &str = "nickname";

/// Rebuild `value` with every object's keys in sorted order
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Run arguments minus the nickname, in canonical form
pub fn hash_args(args: &Map<String, Value>) -> Value {
    let mut stripped = args.clone();
    stripped.remove(NICKNAME_KEY);
    canonicalize(&Value::Object(stripped))
}

/// Compact canonical JSON of the hashed arguments
pub fn canonical_json(args: &Map<String, Value>) -> String {
    hash_args(args).to_string()
}

/// keccak256 over the ABI-encoded canonical JSON string
pub fn compute_rules_hash(args: &Map<String, Value>) -> B256 {
    keccak256((canonical_json(args),).abi_encode_params())
}

/// Look up the feed for this configuration
///
/// `Ok(None)` means the caller must create the feed instead of updating it.
pub async fn resolve_feed<L: OracleLedger + ?Sized>(
    ledger: &L,
    rules_hash: B256,
    authorized_sender: Address,
) -> Result<Option<DataFeedState>, LedgerError> {
    let feed = ledger
        .data_feed_by_rules_hash(rules_hash, authorized_sender)
        .await?;

    match &feed {
        Some(feed) => log::info!("🔎 Found data feed {} for rules hash {}", feed.id, rules_hash),
        None => log::info!("🆕 No data feed for rules hash {}", rules_hash),
    }

    Ok(feed)
}
