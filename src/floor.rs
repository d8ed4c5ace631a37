//! Floor run: one collection's floor price published to its own feed
//!
//! Shares feed identity and the update decision with the mashup run; the
//! value comes straight from a single floor source.

use crate::config::RunKind;
use crate::decision::{Thresholds, UpdateDecision};
use crate::error::MashupError;
use crate::identity::{compute_rules_hash, resolve_feed};
use crate::ledger::OracleLedger;
use crate::providers::kaleidoscope::Kaleidoscope;
use crate::providers::ProviderError;
use crate::secrets::{self, SecretStore, AUTHORIZED_SENDER};
use crate::types::{ExecResult, Numeric};
use crate::update::{emit, settle, FeedTarget};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

/// 0.25%
pub const DEFAULT_DEVIATION_BP: u32 = 25;
pub const DEFAULT_HEARTBEAT_SECS: u64 = 3600;
pub const DEFAULT_CHAIN: &str = "ethereum";

#[derive(Debug, Default, Deserialize)]
pub struct FloorArgs {
    pub nickname: Option<String>,
    pub deviation: Option<u32>,
    pub heartbeat: Option<u64>,
    pub chain: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FloorPlan {
    pub nickname: String,
    pub thresholds: Thresholds,
    pub chain: String,
    pub address: String,
    pub rules_hash: B256,
    pub authorized_sender: Address,
    pub feed_label: String,
}

impl FloorPlan {
    pub fn prepare<S: SecretStore + ?Sized>(
        args: &Map<String, Value>,
        secrets: &S,
    ) -> Result<Self, MashupError> {
        let raw: FloorArgs = serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| MashupError::config(format!("Invalid run arguments: {}", e)))?;

        let nickname = raw.nickname.unwrap_or_default();
        if nickname.is_empty() {
            return Err(MashupError::config("A nickname must be provided"));
        }
        let address = raw.address.unwrap_or_default();
        if address.is_empty() {
            return Err(MashupError::config("An address must be provided"));
        }
        let chain = raw.chain.unwrap_or_else(|| DEFAULT_CHAIN.to_string());

        let sender = secrets::require(secrets, AUTHORIZED_SENDER)?;
        let authorized_sender = sender.parse::<Address>().map_err(|e| {
            MashupError::config(format!("{} is not a valid address: {}", AUTHORIZED_SENDER, e))
        })?;

        Ok(Self {
            feed_label: format!("{}: {}/{}", nickname, chain, address),
            nickname,
            thresholds: Thresholds {
                deviation_bp: raw.deviation.unwrap_or(DEFAULT_DEVIATION_BP),
                heartbeat_secs: raw.heartbeat.unwrap_or(DEFAULT_HEARTBEAT_SECS),
            },
            chain,
            address,
            rules_hash: compute_rules_hash(args),
            authorized_sender,
        })
    }
}

/// Source of a collection's floor price in atomic units
#[async_trait]
pub trait FloorSource: Send + Sync {
    async fn floor(&self, chain: &str, address: &str) -> Result<Numeric, ProviderError>;
}

#[async_trait]
impl FloorSource for Kaleidoscope {
    async fn floor(&self, chain: &str, address: &str) -> Result<Numeric, ProviderError> {
        self.get_floor(chain, address).await
    }
}

async fn try_run<S, L, F>(
    args: &Map<String, Value>,
    secrets: &S,
    ledger: &L,
    source: &F,
    oracle: Address,
) -> Result<ExecResult, MashupError>
where
    S: SecretStore + ?Sized,
    L: OracleLedger + ?Sized,
    F: FloorSource + ?Sized,
{
    let plan = FloorPlan::prepare(args, secrets)?;
    log::info!("✅ All checks passed!");

    let target = FeedTarget {
        oracle,
        label: &plan.feed_label,
        rules_hash: plan.rules_hash,
    };

    // No provider traffic until a feed exists to compare against
    let feed = match resolve_feed(ledger, plan.rules_hash, plan.authorized_sender).await? {
        Some(feed) => feed,
        None => return emit(UpdateDecision::CreateFeed, &target),
    };

    let new_value = source
        .floor(&plan.chain, &plan.address)
        .await
        .map_err(MashupError::FloorSource)?;
    log::info!("🧮 New value: {}", new_value);

    settle(ledger, &target, &feed, &new_value, &plan.thresholds).await
}

/// Run one floor round; failures come back as `canExec: false`
pub async fn run<S, L, F>(
    args: &Map<String, Value>,
    secrets: &S,
    ledger: &L,
    source: &F,
    oracle: Address,
) -> ExecResult
where
    S: SecretStore + ?Sized,
    L: OracleLedger + ?Sized,
    F: FloorSource + ?Sized,
{
    let kind = RunKind::Floor;
    log::info!("🚀 {} v{}", kind.name(), kind.version());

    match try_run(args, secrets, ledger, source, oracle).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("❌ {}", e);
            ExecResult::skip(e.to_string())
        }
    }
}
