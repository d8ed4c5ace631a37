//! Center market data
//!
//! Endpoint: `https://api.center.dev/v1/{chain}/{address}/market-data/market-cap`
//! Center only quotes in ETH.

use super::restful::{round_to_numeric, RestfulProvider};
use super::{NftCollectionDataProvider, ProviderError};
use crate::types::{Currency, Metric, NftCollectionInfo, Numeric, ThrottleConfig};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const NAME: &str = "Center";
const API_HOST: &str = "https://api.center.dev/v1";

#[derive(Debug, Deserialize)]
struct MarketData {
    amount: Amount,
}

#[derive(Debug, Deserialize)]
struct Amount {
    #[serde(rename = "wholeAmount")]
    whole_amount: f64,
}

pub struct Center {
    rest: RestfulProvider,
}

impl Center {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            rest: RestfulProvider::new(NAME, api_key, API_HOST, "X-API-Key", timeout)?,
        })
    }

    fn market_data_url(&self, info: &NftCollectionInfo) -> Result<String, ProviderError> {
        if info.currency != Currency::Eth {
            return Err(ProviderError::unsupported(
                NAME,
                format!("Currency ({}) not supported by Center", info.currency),
            ));
        }

        let metric = match info.metric {
            Metric::MarketCap => "market-cap",
        };

        Ok(format!(
            "{}/{}/{}/market-data/{}",
            self.rest.host(),
            info.chain,
            info.address,
            metric
        ))
    }
}

#[async_trait]
impl NftCollectionDataProvider for Center {
    fn name(&self) -> &'static str {
        NAME
    }

    fn throttle_config(&self) -> ThrottleConfig {
        self.rest.throttle_config()
    }

    async fn get_market_cap(&self, info: &NftCollectionInfo) -> Result<Numeric, ProviderError> {
        let url = self.market_data_url(info)?;
        let data: MarketData = self.rest.get_json(&url).await?;
        round_to_numeric(NAME, data.amount.whole_amount)
    }
}
