use crate::consensus::ConsensusError;
use crate::ledger::abi::EncodingError;
use crate::ledger::LedgerError;
use crate::pointers::PointerError;
use crate::providers::{ProviderError, ProviderId};
use thiserror::Error;

/// Anything that stops a run from emitting calls
///
/// Every variant is reported as `canExec: false` with the error text.
#[derive(Error, Debug)]
pub enum MashupError {
    #[error("{0}")]
    Configuration(String),
    #[error("{source}")]
    Provider {
        provider: ProviderId,
        #[source]
        source: ProviderError,
    },
    #[error(transparent)]
    FloorSource(ProviderError),
    #[error(transparent)]
    Consensus(#[from] ConsensusError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl MashupError {
    pub fn config(message: impl Into<String>) -> Self {
        MashupError::Configuration(message.into())
    }
}

impl From<PointerError> for MashupError {
    fn from(err: PointerError) -> Self {
        MashupError::Configuration(err.to_string())
    }
}
