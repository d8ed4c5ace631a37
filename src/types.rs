//! Shared data types for the mashup keeper
//!
//! All monetary and market-cap quantities are carried as `Numeric`
//! (arbitrary-precision signed integers) so that provider totals, sums and
//! deviation math never lose precision.

use alloy_primitives::{Address, B256};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Arbitrary-precision signed integer used for every valuation
pub type Numeric = BigInt;

/// Chains a contract pointer may live on (wire names are case-sensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Ethereum,
    Polygon,
    Mumbai,
    Solana,
}

impl Chain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum-mainnet",
            Chain::Polygon => "polygon-mainnet",
            Chain::Mumbai => "polygon-mumbai",
            Chain::Solana => "solana-mainnet",
        }
    }
}

impl FromStr for Chain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ethereum-mainnet" => Ok(Chain::Ethereum),
            "polygon-mainnet" => Ok(Chain::Polygon),
            "polygon-mumbai" => Ok(Chain::Mumbai),
            "solana-mainnet" => Ok(Chain::Solana),
            other => Err(format!("Invalid chain: {}", other)),
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Eth,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Eth => "eth",
            Currency::Usd => "usd",
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eth" => Ok(Currency::Eth),
            "usd" => Ok(Currency::Usd),
            other => Err(format!("Invalid currency: {}", other)),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    MarketCap,
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MarketCap" => Ok(Metric::MarketCap),
            other => Err(format!("Invalid metric: {}", other)),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::MarketCap => f.write_str("MarketCap"),
        }
    }
}

/// A token or NFT collection on a specific chain
///
/// Built by [`crate::pointers::unwrap_contract_pointers`], which rejects a
/// missing chain or address. Fields are read through accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractPointer {
    chain: Chain,
    address: String,
}

impl ContractPointer {
    pub(crate) fn new(chain: Chain, address: impl Into<String>) -> Self {
        Self {
            chain,
            address: address.into(),
        }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Request passed to an NFT collection provider for one pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCollectionInfo {
    pub chain: Chain,
    pub address: String,
    pub currency: Currency,
    pub metric: Metric,
}

/// Request passed to a token provider for one pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub chain: Chain,
    pub address: String,
    pub currency: Currency,
}

/// Per-provider admission policy: at most `limit` fetches per `interval_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    pub limit: u32,
    pub interval_ms: u64,
}

impl ThrottleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            interval_ms: 1_000,
        }
    }
}

/// Snapshot of an on-chain data feed as read from the oracle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFeedState {
    pub id: Numeric,
    pub latest_value: Numeric,
    /// Seconds since epoch of the last accepted publish
    pub latest_timestamp: u64,
    pub rules_hash: B256,
    pub authorized_sender: Address,
}

/// One call the executor should submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallData {
    pub to: String,
    pub data: String,
}

/// Result record of one run
///
/// `can_exec == false` always comes with a message; `can_exec == true`
/// always comes with the exact calls to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecResult {
    pub can_exec: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_data: Option<Vec<CallData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExecResult {
    pub fn skip(message: impl Into<String>) -> Self {
        Self {
            can_exec: false,
            call_data: None,
            message: Some(message.into()),
        }
    }

    pub fn exec(call_data: Vec<CallData>) -> Self {
        Self {
            can_exec: true,
            call_data: Some(call_data),
            message: None,
        }
    }
}
