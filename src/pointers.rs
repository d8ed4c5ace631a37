//! Contract pointer parsing
//!
//! Turns the flat `"chain:address"` lists from the run arguments into
//! structured [`ContractPointer`]s.

use crate::types::{Chain, ContractPointer};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PointerError {
    #[error("Invalid contract pointer: {0}")]
    Malformed(String),
    #[error("Invalid chain in contract pointer {pointer}: {chain}")]
    UnknownChain { pointer: String, chain: String },
}

/// Parse `"chain:address"` strings into contract pointers
///
/// An empty list, or a list holding a single empty string, yields no
/// pointers. Any entry missing the separator or either half fails the
/// whole list.
pub fn unwrap_contract_pointers<S: AsRef<str>>(
    contracts: &[S],
) -> Result<Vec<ContractPointer>, PointerError> {
    if contracts.is_empty() || (contracts.len() == 1 && contracts[0].as_ref().is_empty()) {
        return Ok(Vec::new());
    }

    contracts
        .iter()
        .map(|raw| {
            let raw = raw.as_ref();
            let mut parts = raw.split(':');
            let chain = parts.next().unwrap_or_default();
            let address = parts.next().unwrap_or_default();

            if chain.is_empty() || address.is_empty() {
                return Err(PointerError::Malformed(raw.to_string()));
            }

            let chain = chain
                .parse::<Chain>()
                .map_err(|_| PointerError::UnknownChain {
                    pointer: raw.to_string(),
                    chain: chain.to_string(),
                })?;

            Ok(ContractPointer::new(chain, address))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_yield_no_pointers() {
        let empty: Vec<String> = vec![];
        assert_eq!(unwrap_contract_pointers(&empty[..]), Ok(vec![]));
        assert_eq!(unwrap_contract_pointers(&[""]), Ok(vec![]));
    }

    #[test]
    fn test_single_pointer() {
        let pointers = unwrap_contract_pointers(&["ethereum-mainnet:0xabc"]).unwrap();
        assert_eq!(
            pointers,
            vec![ContractPointer::new(Chain::Ethereum, "0xabc")]
        );
    }

    #[test]
    fn test_multiple_pointers_keep_order() {
        let pointers =
            unwrap_contract_pointers(&["polygon-mainnet:0x1", "solana-mainnet:So1111"]).unwrap();
        assert_eq!(pointers.len(), 2);
        assert_eq!(pointers[0].chain(), Chain::Polygon);
        assert_eq!(pointers[1].chain(), Chain::Solana);
        assert_eq!(pointers[1].address(), "So1111");
    }

    #[test]
    fn test_malformed_pointers_fail() {
        assert!(matches!(
            unwrap_contract_pointers(&["ethereum-mainnet"]),
            Err(PointerError::Malformed(_))
        ));
        assert!(matches!(
            unwrap_contract_pointers(&["ethereum-mainnet:"]),
            Err(PointerError::Malformed(_))
        ));
        assert!(matches!(
            unwrap_contract_pointers(&[":0xabc"]),
            Err(PointerError::Malformed(_))
        ));
        // An empty entry is only tolerated when it is the sole entry
        assert!(matches!(
            unwrap_contract_pointers(&["ethereum-mainnet:0xabc", ""]),
            Err(PointerError::Malformed(_))
        ));
    }

    #[test]
    fn test_unknown_chain_fails() {
        assert!(matches!(
            unwrap_contract_pointers(&["bitcoin:bc1q"]),
            Err(PointerError::UnknownChain { .. })
        ));
    }
}
