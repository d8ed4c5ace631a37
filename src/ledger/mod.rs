//! Oracle ledger access
//!
//! The keeper never writes to the chain itself. It reads the feed that
//! matches a rules hash and the latest block time, and hands back call data
//! for the executor to submit.

pub mod abi;
pub mod rpc;

use crate::types::DataFeedState;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use thiserror::Error;

pub use rpc::JsonRpcLedger;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger transport error: {0}")]
    Transport(String),
    #[error("Ledger RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Ledger decode error: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for LedgerError {
    fn from(err: reqwest::Error) -> Self {
        LedgerError::Transport(err.to_string())
    }
}

/// Read side of the oracle contract and its chain
#[async_trait]
pub trait OracleLedger: Send + Sync {
    /// Feed registered under `(rules_hash, authorized_sender)`
    ///
    /// Returns `Ok(None)` when no such feed exists; that is the signal to
    /// create one, not an error.
    async fn data_feed_by_rules_hash(
        &self,
        rules_hash: B256,
        authorized_sender: Address,
    ) -> Result<Option<DataFeedState>, LedgerError>;

    /// Timestamp of the latest block, in seconds
    async fn block_timestamp(&self) -> Result<u64, LedgerError>;
}
