//! CoinGecko token prices
//!
//! Endpoint: `https://api.coingecko.com/api/v3/simple/token_price/{platform}`

use super::restful::{round_to_numeric, RestfulProvider};
use super::{ProviderError, TokenDataProvider};
use crate::types::{Chain, Numeric, ThrottleConfig, TokenInfo};
use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;
use std::time::Duration;

const NAME: &str = "CoinGecko";
const API_HOST: &str = "https://api.coingecko.com/api/v3";

/// `{contract: {"usd": .., "usd_market_cap": ..}}`
type TokenPriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

pub struct CoinGecko {
    rest: RestfulProvider,
}

fn platform(chain: Chain) -> Option<&'static str> {
    match chain {
        Chain::Ethereum => Some("ethereum"),
        Chain::Polygon => Some("polygon-pos"),
        Chain::Solana => Some("solana"),
        Chain::Mumbai => None,
    }
}

impl CoinGecko {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            rest: RestfulProvider::new(NAME, api_key, API_HOST, "x-cg-pro-api-key", timeout)?,
        })
    }

    fn token_price_url(&self, info: &TokenInfo) -> Result<Url, ProviderError> {
        let platform = platform(info.chain).ok_or_else(|| {
            ProviderError::unsupported(NAME, format!("Chain ({}) not supported by CoinGecko", info.chain))
        })?;

        Url::parse_with_params(
            &format!("{}/simple/token_price/{}", self.rest.host(), platform),
            &[
                ("contract_addresses", info.address.as_str()),
                ("vs_currencies", info.currency.as_str()),
                ("include_market_cap", "true"),
                ("include_24hr_vol", "false"),
                ("include_24hr_change", "false"),
                ("include_last_updated_at", "false"),
            ],
        )
        .map_err(|e| ProviderError::request(NAME, e))
    }
}

/// Pick the market cap for `info` out of a token price response
fn extract_market_cap(response: &TokenPriceResponse, info: &TokenInfo) -> Result<f64, ProviderError> {
    let entry = response
        .get(&info.address.to_lowercase())
        .or_else(|| response.get(&info.address))
        .or_else(|| response.values().next())
        .ok_or_else(|| ProviderError::MissingValue {
            provider: NAME,
            reason: format!("no price entry for {}", info.address),
        })?;

    let key = format!("{}_market_cap", info.currency);
    entry
        .get(&key)
        .copied()
        .flatten()
        .ok_or_else(|| ProviderError::MissingValue {
            provider: NAME,
            reason: format!("no {} for {}", key, info.address),
        })
}

#[async_trait]
impl TokenDataProvider for CoinGecko {
    fn name(&self) -> &'static str {
        NAME
    }

    fn throttle_config(&self) -> ThrottleConfig {
        self.rest.throttle_config()
    }

    async fn get_market_cap(&self, info: &TokenInfo) -> Result<Numeric, ProviderError> {
        let url = self.token_price_url(info)?;
        let response: TokenPriceResponse = self.rest.get_json(url.as_str()).await?;
        round_to_numeric(NAME, extract_market_cap(&response, info)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;

    fn info(chain: Chain, currency: Currency) -> TokenInfo {
        TokenInfo {
            chain,
            address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string(),
            currency,
        }
    }

    #[test]
    fn test_token_price_url() {
        let provider = CoinGecko::new("key", Duration::from_secs(5)).unwrap();
        let url = provider
            .token_price_url(&info(Chain::Polygon, Currency::Usd))
            .unwrap();

        assert_eq!(url.path(), "/api/v3/simple/token_price/polygon-pos");
        let query: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(query["contract_addresses"], "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
        assert_eq!(query["vs_currencies"], "usd");
        assert_eq!(query["include_market_cap"], "true");
        assert_eq!(query["include_last_updated_at"], "false");
    }

    #[tokio::test]
    async fn test_mumbai_is_unsupported() {
        let provider = CoinGecko::new("key", Duration::from_secs(5)).unwrap();
        let err = provider
            .get_market_cap(&info(Chain::Mumbai, Currency::Usd))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unsupported { .. }));
    }

    #[test]
    fn test_extract_market_cap() {
        let response: TokenPriceResponse = serde_json::from_str(
            r#"{"0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48": {"usd": 1.0, "usd_market_cap": 25000000000.4}}"#,
        )
        .unwrap();

        assert_eq!(
            extract_market_cap(&response, &info(Chain::Ethereum, Currency::Usd)).unwrap(),
            25000000000.4
        );
        assert!(matches!(
            extract_market_cap(&response, &info(Chain::Ethereum, Currency::Eth)),
            Err(ProviderError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_extract_market_cap_empty_response() {
        let response = TokenPriceResponse::new();
        assert!(extract_market_cap(&response, &info(Chain::Ethereum, Currency::Usd)).is_err());
    }
}
