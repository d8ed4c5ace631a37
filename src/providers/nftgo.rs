//! NFTGo collection metrics
//!
//! Endpoint: `https://data-api.nftgo.io/eth/v1/collection/{address}/metrics`
//! Only Ethereum mainnet collections are supported.

use super::restful::{round_to_numeric, RestfulProvider};
use super::{NftCollectionDataProvider, ProviderError};
use crate::types::{Chain, Currency, Metric, NftCollectionInfo, Numeric, ThrottleConfig};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const NAME: &str = "NftGo";
const API_HOST: &str = "https://data-api.nftgo.io";

#[derive(Debug, Deserialize)]
struct CollectionMetrics {
    market_cap_usd: Option<f64>,
    market_cap_eth: Option<f64>,
}

pub struct NftGo {
    rest: RestfulProvider,
}

impl NftGo {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            rest: RestfulProvider::new(NAME, api_key, API_HOST, "X-API-KEY", timeout)?,
        })
    }

    fn metrics_url(&self, info: &NftCollectionInfo) -> Result<String, ProviderError> {
        if info.chain != Chain::Ethereum {
            return Err(ProviderError::unsupported(
                NAME,
                format!("Chain ({}) not supported by NFTGo", info.chain),
            ));
        }

        Ok(format!(
            "{}/eth/v1/collection/{}/metrics",
            self.rest.host(),
            info.address
        ))
    }
}

#[async_trait]
impl NftCollectionDataProvider for NftGo {
    fn name(&self) -> &'static str {
        NAME
    }

    fn throttle_config(&self) -> ThrottleConfig {
        ThrottleConfig {
            limit: 2,
            interval_ms: 1_000,
        }
    }

    async fn get_market_cap(&self, info: &NftCollectionInfo) -> Result<Numeric, ProviderError> {
        let url = self.metrics_url(info)?;
        let metrics: CollectionMetrics = self.rest.get_json(&url).await?;

        let value = match (info.metric, info.currency) {
            (Metric::MarketCap, Currency::Usd) => metrics.market_cap_usd,
            (Metric::MarketCap, Currency::Eth) => metrics.market_cap_eth,
        };

        let value = value.ok_or_else(|| ProviderError::MissingValue {
            provider: NAME,
            reason: format!("no {} market cap for {}", info.currency, info.address),
        })?;

        round_to_numeric(NAME, value)
    }
}
