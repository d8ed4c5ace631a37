//! Shared REST plumbing for API-key authenticated providers

use super::ProviderError;
use crate::types::{Numeric, ThrottleConfig};
use num_traits::FromPrimitive;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Fetches use one fixed timeout and are never retried
pub struct RestfulProvider {
    name: &'static str,
    key: String,
    host: String,
    key_header: &'static str,
    client: reqwest::Client,
}

impl RestfulProvider {
    pub fn new(
        name: &'static str,
        api_key: &str,
        host: &str,
        key_header: &'static str,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::request(name, e))?;

        Ok(Self {
            name,
            key: api_key.to_string(),
            host: host.to_string(),
            key_header,
            client,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Default admission policy for REST providers
    pub fn throttle_config(&self) -> ThrottleConfig {
        ThrottleConfig::default()
    }

    /// GET `url` with the API key header and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        log::debug!("🌐 {} fetching {}", self.name, url);

        let response = self
            .client
            .get(url)
            .header(self.key_header, &self.key)
            .send()
            .await
            .map_err(|e| ProviderError::request(self.name, e))?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: self.name,
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::request(self.name, e))
    }
}

/// Round a provider float to the nearest integer valuation
pub fn round_to_numeric(provider: &'static str, value: f64) -> Result<Numeric, ProviderError> {
    Numeric::from_f64(value.round()).ok_or_else(|| ProviderError::MissingValue {
        provider,
        reason: format!("non-finite value {}", value),
    })
}
