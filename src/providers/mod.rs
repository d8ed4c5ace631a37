//! Valuation providers
//!
//! Two capability traits split providers by what they value:
//!
//! - [`NftCollectionDataProvider`] - market cap of an NFT collection
//! - [`TokenDataProvider`] - market cap of a fungible token
//!
//! Concrete providers live in a closed set ([`ProviderId`]). Selecting one
//! at runtime yields a [`SelectedProvider`] variant that is carried through
//! the aggregation path, so dispatch is an explicit `match`.

pub mod center;
pub mod coingecko;
pub mod kaleidoscope;
pub mod nftgo;
pub mod restful;
pub mod throttle;

use crate::types::{NftCollectionInfo, Numeric, ThrottleConfig, TokenInfo};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub use center::Center;
pub use coingecko::CoinGecko;
pub use nftgo::NftGo;
pub use throttle::Throttle;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider}: {reason}")]
    Unsupported { provider: &'static str, reason: String },
    #[error("{provider}: request failed: {reason}")]
    Request { provider: &'static str, reason: String },
    #[error("{provider}: HTTP {status} from {url}")]
    Status {
        provider: &'static str,
        status: u16,
        url: String,
    },
    #[error("{provider}: {reason}")]
    MissingValue { provider: &'static str, reason: String },
}

impl ProviderError {
    pub fn request(provider: &'static str, err: impl fmt::Display) -> Self {
        ProviderError::Request {
            provider,
            reason: err.to_string(),
        }
    }

    pub fn unsupported(provider: &'static str, reason: impl Into<String>) -> Self {
        ProviderError::Unsupported {
            provider,
            reason: reason.into(),
        }
    }
}

/// Values the market cap of NFT collections
#[async_trait]
pub trait NftCollectionDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn throttle_config(&self) -> ThrottleConfig;

    async fn get_market_cap(&self, info: &NftCollectionInfo) -> Result<Numeric, ProviderError>;
}

/// Values the market cap of fungible tokens
#[async_trait]
pub trait TokenDataProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn throttle_config(&self) -> ThrottleConfig;

    async fn get_market_cap(&self, info: &TokenInfo) -> Result<Numeric, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    NftCollection,
    Token,
}

/// Closed set of provider integrations (wire names are case-sensitive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    NftGo,
    Center,
    CoinGecko,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::NftGo => "NftGo",
            ProviderId::Center => "Center",
            ProviderId::CoinGecko => "CoinGecko",
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderId::NftGo | ProviderId::Center => ProviderKind::NftCollection,
            ProviderId::CoinGecko => ProviderKind::Token,
        }
    }

    /// Secret holding this provider's API key
    pub fn secret_name(&self) -> &'static str {
        match self {
            ProviderId::NftGo => "NFTGO_API_KEY",
            ProviderId::Center => "CENTER_API_KEY",
            ProviderId::CoinGecko => "COINGECKO_API_KEY",
        }
    }

    /// Build the HTTP integration for this provider
    pub fn connect(&self, api_key: &str, timeout: Duration) -> Result<SelectedProvider, ProviderError> {
        Ok(match self {
            ProviderId::NftGo => SelectedProvider::Nft(NftProvider::NftGo(NftGo::new(api_key, timeout)?)),
            ProviderId::Center => {
                SelectedProvider::Nft(NftProvider::Center(Center::new(api_key, timeout)?))
            }
            ProviderId::CoinGecko => {
                SelectedProvider::Token(TokenProvider::CoinGecko(CoinGecko::new(api_key, timeout)?))
            }
        })
    }
}

impl FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NftGo" => Ok(ProviderId::NftGo),
            "Center" => Ok(ProviderId::Center),
            "CoinGecko" => Ok(ProviderId::CoinGecko),
            other => Err(format!("Provider {} not supported", other)),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub enum NftProvider {
    NftGo(NftGo),
    Center(Center),
}

#[async_trait]
impl NftCollectionDataProvider for NftProvider {
    fn name(&self) -> &'static str {
        match self {
            NftProvider::NftGo(p) => p.name(),
            NftProvider::Center(p) => p.name(),
        }
    }

    fn throttle_config(&self) -> ThrottleConfig {
        match self {
            NftProvider::NftGo(p) => p.throttle_config(),
            NftProvider::Center(p) => p.throttle_config(),
        }
    }

    async fn get_market_cap(&self, info: &NftCollectionInfo) -> Result<Numeric, ProviderError> {
        match self {
            NftProvider::NftGo(p) => p.get_market_cap(info).await,
            NftProvider::Center(p) => p.get_market_cap(info).await,
        }
    }
}

pub enum TokenProvider {
    CoinGecko(CoinGecko),
}

#[async_trait]
impl TokenDataProvider for TokenProvider {
    fn name(&self) -> &'static str {
        match self {
            TokenProvider::CoinGecko(p) => p.name(),
        }
    }

    fn throttle_config(&self) -> ThrottleConfig {
        match self {
            TokenProvider::CoinGecko(p) => p.throttle_config(),
        }
    }

    async fn get_market_cap(&self, info: &TokenInfo) -> Result<Numeric, ProviderError> {
        match self {
            TokenProvider::CoinGecko(p) => p.get_market_cap(info).await,
        }
    }
}

/// Whichever provider a run selected, tagged by capability
pub enum SelectedProvider {
    Nft(NftProvider),
    Token(TokenProvider),
}

impl SelectedProvider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            SelectedProvider::Nft(_) => ProviderKind::NftCollection,
            SelectedProvider::Token(_) => ProviderKind::Token,
        }
    }
}
