//! JSON-RPC implementation of [`OracleLedger`]

use super::abi::{data_feed_info_request, decode_data_feed_info, to_hex};
use super::{LedgerError, OracleLedger};
use crate::types::DataFeedState;
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// EIP-1474 code for a reverted execution
const EXECUTION_REVERTED: i64 = 3;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct BlockHeader {
    timestamp: String,
}

/// Talks to an EVM node over HTTP JSON-RPC
pub struct JsonRpcLedger {
    client: reqwest::Client,
    rpc_url: String,
    oracle: Address,
}

impl JsonRpcLedger {
    pub fn new(rpc_url: &str, oracle: Address, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            rpc_url: rpc_url.to_string(),
            oracle,
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        log::debug!("🔗 {} -> {}", method, self.rpc_url);

        let response = self.client.post(&self.rpc_url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(LedgerError::Transport(format!(
                "{} returned HTTP {}",
                method,
                response.status()
            )));
        }

        let response: RpcResponse = response.json().await?;

        if let Some(error) = response.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response
            .result
            .ok_or_else(|| LedgerError::Decode(format!("{} returned no result", method)))
    }
}

fn is_revert(err: &LedgerError) -> bool {
    match err {
        LedgerError::Rpc { code, message } => {
            *code == EXECUTION_REVERTED || message.to_lowercase().contains("revert")
        }
        _ => false,
    }
}

fn parse_hex_u64(raw: &str) -> Result<u64, LedgerError> {
    u64::from_str_radix(raw.trim_start_matches("0x"), 16)
        .map_err(|e| LedgerError::Decode(format!("invalid quantity {}: {}", raw, e)))
}

#[async_trait]
impl OracleLedger for JsonRpcLedger {
    async fn data_feed_by_rules_hash(
        &self,
        rules_hash: B256,
        authorized_sender: Address,
    ) -> Result<Option<DataFeedState>, LedgerError> {
        let call = json!({
            "to": self.oracle.to_checksum(None),
            "data": to_hex(&data_feed_info_request(rules_hash, authorized_sender)),
        });

        let result = match self.request("eth_call", json!([call, "latest"])).await {
            Ok(result) => result,
            Err(err) if is_revert(&err) => {
                log::debug!("Feed lookup reverted ({}), treating as not found", err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        let raw = result
            .as_str()
            .ok_or_else(|| LedgerError::Decode("eth_call result is not a string".to_string()))?;
        let bytes = hex::decode(raw.trim_start_matches("0x"))
            .map_err(|e| LedgerError::Decode(e.to_string()))?;

        decode_data_feed_info(&bytes)
            .map(Some)
            .map_err(|e| LedgerError::Decode(e.to_string()))
    }

    async fn block_timestamp(&self) -> Result<u64, LedgerError> {
        let result = self
            .request("eth_getBlockByNumber", json!(["latest", false]))
            .await?;

        let header: BlockHeader =
            serde_json::from_value(result).map_err(|e| LedgerError::Decode(e.to_string()))?;

        parse_hex_u64(&header.timestamp)
    }
}
