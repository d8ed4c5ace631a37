//! Mashup run: market caps from several providers folded into one feed value
//!
//! One invocation goes through these steps in order and stops at the first
//! failure, emitting nothing:
//!
//! 1. validate the run arguments
//! 2. resolve every secret the run will need
//! 3. compute the rules hash and look up the feed (missing -> create it)
//! 4. fetch all providers concurrently
//! 5. consensus over NFT values plus consensus over token values
//! 6. decide against the feed's latest value and block time

use crate::aggregator::{run_provider, ProviderValue};
use crate::config::RunKind;
use crate::consensus::{reach_consensus, ConsensusError, ConsensusMechanism};
use crate::decision::{Thresholds, UpdateDecision};
use crate::error::MashupError;
use crate::identity::{canonical_json, compute_rules_hash, resolve_feed};
use crate::ledger::OracleLedger;
use crate::pointers::unwrap_contract_pointers;
use crate::providers::{ProviderError, ProviderId, ProviderKind};
use crate::secrets::{self, SecretStore, AUTHORIZED_SENDER};
use crate::types::{ContractPointer, Currency, ExecResult, Metric, Numeric};
use crate::update::{emit, settle, FeedTarget};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use futures::future::try_join_all;
use num_traits::Zero;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// 0.50%
pub const DEFAULT_DEVIATION_BP: u32 = 50;
/// 1 hour
pub const DEFAULT_HEARTBEAT_SECS: u64 = 3600;

/// Run arguments as they arrive on the wire
///
/// Every field may be absent or `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MashupArgs {
    pub nickname: Option<String>,
    pub deviation: Option<u32>,
    pub heartbeat: Option<u64>,
    pub providers: Option<Vec<String>>,
    pub consensus_mechanism: Option<String>,
    pub currency: Option<String>,
    pub metric: Option<String>,
    pub nft_collections: Option<Vec<String>>,
    pub tokens: Option<Vec<String>>,
}

impl MashupArgs {
    pub fn from_map(args: &Map<String, Value>) -> Result<Self, MashupError> {
        serde_json::from_value(Value::Object(args.clone()))
            .map_err(|e| MashupError::config(format!("Invalid run arguments: {}", e)))
    }
}

/// A provider together with the API key it authenticates with
#[derive(Clone)]
pub struct ProviderCredentials {
    pub id: ProviderId,
    pub api_key: String,
}

/// Everything a run needs, validated and with secrets resolved
#[derive(Clone)]
pub struct MashupPlan {
    pub nickname: String,
    pub thresholds: Thresholds,
    pub providers: Vec<ProviderCredentials>,
    pub mechanism: ConsensusMechanism,
    pub currency: Currency,
    pub metric: Metric,
    pub nft_collections: Vec<ContractPointer>,
    pub tokens: Vec<ContractPointer>,
    pub rules_hash: B256,
    pub authorized_sender: Address,
    /// Nickname stored with a newly created feed
    pub feed_label: String,
}

impl MashupPlan {
    /// Validate `args` and resolve secrets; no network access happens here
    pub fn prepare<S: SecretStore + ?Sized>(
        args: &Map<String, Value>,
        secrets: &S,
    ) -> Result<Self, MashupError> {
        let raw = MashupArgs::from_map(args)?;

        let nickname = raw.nickname.unwrap_or_default();
        if nickname.is_empty() {
            return Err(MashupError::config("A nickname must be provided"));
        }

        let raw_providers = raw.providers.unwrap_or_default();
        if raw_providers.is_empty() {
            return Err(MashupError::config(
                "An array of one or more providers must be provided in the form of an array of strings (e.g. \"NftGo\")",
            ));
        }
        let provider_ids = raw_providers
            .iter()
            .map(|p| p.parse::<ProviderId>().map_err(MashupError::Configuration))
            .collect::<Result<Vec<_>, _>>()?;

        let mechanism = match &raw.consensus_mechanism {
            Some(m) => m.parse::<ConsensusMechanism>()?,
            None => ConsensusMechanism::default(),
        };
        let currency = match &raw.currency {
            Some(c) => c.parse::<Currency>().map_err(MashupError::Configuration)?,
            None => Currency::Usd,
        };
        let metric = match &raw.metric {
            Some(m) => m.parse::<Metric>().map_err(MashupError::Configuration)?,
            None => Metric::MarketCap,
        };

        let nft_collections = unwrap_contract_pointers(&raw.nft_collections.unwrap_or_default()[..])?;
        let tokens = unwrap_contract_pointers(&raw.tokens.unwrap_or_default()[..])?;
        if nft_collections.is_empty() && tokens.is_empty() {
            return Err(MashupError::config(
                "An array of one or more NFT collections and/or tokens must be provided in the form of an array of contract pointers (e.g. \"ethereum-mainnet:0x1234...\")",
            ));
        }

        let sender = secrets::require(secrets, AUTHORIZED_SENDER)?;
        let authorized_sender = sender.parse::<Address>().map_err(|e| {
            MashupError::config(format!("{} is not a valid address: {}", AUTHORIZED_SENDER, e))
        })?;

        let providers = provider_ids
            .into_iter()
            .map(|id| -> Result<ProviderCredentials, MashupError> {
                Ok(ProviderCredentials {
                    id,
                    api_key: secrets::require(secrets, id.secret_name())?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            feed_label: format!("{}: ({})", nickname, canonical_json(args)),
            nickname,
            thresholds: Thresholds {
                deviation_bp: raw.deviation.unwrap_or(DEFAULT_DEVIATION_BP),
                heartbeat_secs: raw.heartbeat.unwrap_or(DEFAULT_HEARTBEAT_SECS),
            },
            providers,
            mechanism,
            currency,
            metric,
            nft_collections,
            tokens,
            rules_hash: compute_rules_hash(args),
            authorized_sender,
        })
    }
}

/// Where provider totals come from
#[async_trait]
pub trait ValuationSource: Send + Sync {
    /// Total of one provider over the plan's pointers of its kind
    async fn value(
        &self,
        plan: &MashupPlan,
        provider: &ProviderCredentials,
    ) -> Result<ProviderValue, ProviderError>;
}

/// Live provider APIs over HTTP
pub struct HttpValuationSource {
    timeout: Duration,
}

impl HttpValuationSource {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ValuationSource for HttpValuationSource {
    async fn value(
        &self,
        plan: &MashupPlan,
        provider: &ProviderCredentials,
    ) -> Result<ProviderValue, ProviderError> {
        run_provider(
            provider.id,
            &provider.api_key,
            &plan.nft_collections,
            &plan.tokens,
            plan.currency,
            plan.metric,
            self.timeout,
        )
        .await
    }
}

/// Fetch every provider in the plan concurrently
///
/// The first failing provider fails the whole collection.
pub async fn collect_values<V: ValuationSource + ?Sized>(
    source: &V,
    plan: &MashupPlan,
) -> Result<Vec<ProviderValue>, MashupError> {
    let fetches = plan.providers.iter().map(|provider| async move {
        source
            .value(plan, provider)
            .await
            .map_err(|err| MashupError::Provider {
                provider: provider.id,
                source: err,
            })
    });

    try_join_all(fetches).await
}

fn kind_consensus(
    values: &[ProviderValue],
    kind: ProviderKind,
    mechanism: &ConsensusMechanism,
) -> Result<Numeric, ConsensusError> {
    let values: Vec<Numeric> = values
        .iter()
        .filter(|v| v.kind == kind)
        .map(|v| v.value.clone())
        .collect();

    if values.is_empty() {
        return Ok(Numeric::zero());
    }
    reach_consensus(values, mechanism)
}

/// Consensus over NFT providers plus consensus over token providers
pub fn combine(
    values: &[ProviderValue],
    mechanism: &ConsensusMechanism,
) -> Result<Numeric, ConsensusError> {
    let nft = kind_consensus(values, ProviderKind::NftCollection, mechanism)?;
    let token = kind_consensus(values, ProviderKind::Token, mechanism)?;
    Ok(nft + token)
}

async fn try_run<S, L, V>(
    args: &Map<String, Value>,
    secrets: &S,
    ledger: &L,
    source: &V,
    oracle: Address,
) -> Result<ExecResult, MashupError>
where
    S: SecretStore + ?Sized,
    L: OracleLedger + ?Sized,
    V: ValuationSource + ?Sized,
{
    let plan = MashupPlan::prepare(args, secrets)?;
    log::info!("✅ All checks passed!");
    log::debug!(
        "Plan: {} providers, {} NFT collections, {} tokens, {} in {}",
        plan.providers.len(),
        plan.nft_collections.len(),
        plan.tokens.len(),
        plan.metric,
        plan.currency
    );

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

    let values = collect_values(source, &plan).await?;
    let new_value = combine(&values, &plan.mechanism)?;
    log::info!("🧮 New value ({}): {}", plan.mechanism, new_value);

    settle(ledger, &target, &feed, &new_value, &plan.thresholds).await
}

/// Run one mashup round; failures come back as `canExec: false`
pub async fn run<S, L, V>(
    args: &Map<String, Value>,
    secrets: &S,
    ledger: &L,
    source: &V,
    oracle: Address,
) -> ExecResult
where
    S: SecretStore + ?Sized,
    L: OracleLedger + ?Sized,
    V: ValuationSource + ?Sized,
{
    let kind = RunKind::Mashup;
    log::info!("🚀 {} v{}", kind.name(), kind.version());

    match try_run(args, secrets, ledger, source, oracle).await {
        Ok(result) => result,
        Err(e) => {
            log::error!("❌ {}", e);
            ExecResult::skip(e.to_string())
        }
    }
}
