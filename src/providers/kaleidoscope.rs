//! Kaleidoscope collection floor price
//!
//! Endpoint: `https://api.kaleidoscope.mimicry.org/v1/collections/{chain}/{address}/floor`
//!
//! The floor is returned in atomic units as a decimal string (sometimes with
//! a trailing `n` from a BigInt serializer), so it is parsed exactly instead
//! of going through a float.

use super::restful::RestfulProvider;
use super::ProviderError;
use crate::types::Numeric;
use serde::Deserialize;
use std::time::Duration;

const NAME: &str = "Kaleidoscope";
const API_HOST: &str = "https://api.kaleidoscope.mimicry.org/v1";

#[derive(Debug, Deserialize)]
struct FloorResponse {
    amount: FloorAmount,
}

#[derive(Debug, Deserialize)]
struct FloorAmount {
    atomic: String,
}

pub struct Kaleidoscope {
    rest: RestfulProvider,
}

impl Kaleidoscope {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            rest: RestfulProvider::new(NAME, api_key, API_HOST, "x-api-key", timeout)?,
        })
    }

    fn floor_url(&self, chain: &str, address: &str) -> String {
        format!("{}/collections/{}/{}/floor", self.rest.host(), chain, address)
    }

    /// Floor price of `chain/address` in atomic units
    pub async fn get_floor(&self, chain: &str, address: &str) -> Result<Numeric, ProviderError> {
        let response: FloorResponse = self.rest.get_json(&self.floor_url(chain, address)).await?;
        parse_atomic(&response.amount.atomic)
    }
}

fn parse_atomic(raw: &str) -> Result<Numeric, ProviderError> {
    raw.trim_end_matches('n')
        .parse::<Numeric>()
        .map_err(|e| ProviderError::MissingValue {
            provider: NAME,
            reason: format!("invalid atomic amount {:?}: {}", raw, e),
        })
}
