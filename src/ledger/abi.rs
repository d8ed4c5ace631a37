//! Open Markets Oracle ABI and call encoding

use crate::types::{CallData, DataFeedState, Numeric};
use alloy_primitives::{Address, B256, I256, U256};
use alloy_sol_types::{sol, SolCall};
use num_bigint::Sign;
use thiserror::Error;

sol! {
    struct LatestValue {
        int256 value;
        uint256 timestamp;
    }

    struct DataFeedInfo {
        uint256 id;
        string nickname;
        bytes32 rulesHash;
        address authorizedSender;
        LatestValue latestValue;
    }

    function createDataFeed(string memory nickname, bytes32 rulesHash) external returns (uint256 dataFeedId);

    function updateValue(uint256 dataFeedId, int256 value) external;

    function getDataFeedInfoByHash(bytes32 rulesHash, address authorizedSender)
        external
        view
        returns (DataFeedInfo memory info);
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Value {0} does not fit in int256")]
    ValueOutOfRange(Numeric),
    #[error("Data feed id {0} does not fit in uint256")]
    FeedIdOutOfRange(Numeric),
}

/// `0x`-prefixed lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn numeric_from_u256(value: U256) -> Numeric {
    Numeric::from_bytes_be(Sign::Plus, &value.to_be_bytes::<32>())
}

pub fn numeric_from_i256(value: I256) -> Numeric {
    let magnitude = numeric_from_u256(value.unsigned_abs());
    if value.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

pub fn numeric_to_u256(value: &Numeric) -> Option<U256> {
    if value.sign() == Sign::Minus {
        return None;
    }
    let (_, bytes) = value.to_bytes_be();
    U256::try_from_be_slice(&bytes)
}

pub fn numeric_to_i256(value: &Numeric) -> Option<I256> {
    I256::from_dec_str(&value.to_string()).ok()
}

/// Call data for `createDataFeed(nickname, rulesHash)`
pub fn create_data_feed_call(oracle: Address, nickname: &str, rules_hash: B256) -> CallData {
    let call = createDataFeedCall {
        nickname: nickname.to_string(),
        rulesHash: rules_hash,
    };
    CallData {
        to: oracle.to_checksum(None),
        data: to_hex(&call.abi_encode()),
    }
}

/// Call data for `updateValue(dataFeedId, value)`
pub fn update_value_call(
    oracle: Address,
    data_feed_id: &Numeric,
    value: &Numeric,
) -> Result<CallData, EncodingError> {
    let call = updateValueCall {
        dataFeedId: numeric_to_u256(data_feed_id)
            .ok_or_else(|| EncodingError::FeedIdOutOfRange(data_feed_id.clone()))?,
        value: numeric_to_i256(value).ok_or_else(|| EncodingError::ValueOutOfRange(value.clone()))?,
    };
    Ok(CallData {
        to: oracle.to_checksum(None),
        data: to_hex(&call.abi_encode()),
    })
}

/// Call data for the `getDataFeedInfoByHash(bytes32,address)` view
pub fn data_feed_info_request(rules_hash: B256, authorized_sender: Address) -> Vec<u8> {
    getDataFeedInfoByHashCall {
        rulesHash: rules_hash,
        authorizedSender: authorized_sender,
    }
    .abi_encode()
}

/// Decode the `getDataFeedInfoByHash` return data
pub fn decode_data_feed_info(data: &[u8]) -> Result<DataFeedState, alloy_sol_types::Error> {
    let info = getDataFeedInfoByHashCall::abi_decode_returns(data, true)?.info;
    Ok(DataFeedState {
        id: numeric_from_u256(info.id),
        latest_value: numeric_from_i256(info.latestValue.value),
        latest_timestamp: u64::try_from(info.latestValue.timestamp).unwrap_or(u64::MAX),
        rules_hash: info.rulesHash,
        authorized_sender: info.authorizedSender,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolValue;

    #[test]
    fn test_numeric_conversions() {
        let value: Numeric = "-123456789012345678901234567890".parse().unwrap();
        let signed = numeric_to_i256(&value).unwrap();
        assert_eq!(numeric_from_i256(signed), value);

        let unsigned = numeric_to_u256(&Numeric::from(42u8)).unwrap();
        assert_eq!(unsigned, U256::from(42u8));
        assert_eq!(numeric_from_u256(unsigned), Numeric::from(42u8));

        assert!(numeric_to_u256(&Numeric::from(-1)).is_none());
        let too_big = Numeric::from(1u8) << 256;
        assert!(numeric_to_u256(&too_big).is_none());
        assert!(numeric_to_i256(&too_big).is_none());
    }

    #[test]
    fn test_update_value_call_encoding() {
        let oracle = Address::repeat_byte(0x11);
        let call = update_value_call(oracle, &Numeric::from(3), &Numeric::from(1_000)).unwrap();

        let bytes = hex::decode(call.data.trim_start_matches("0x")).unwrap();
        assert_eq!(&bytes[..4], updateValueCall::SELECTOR.as_slice());

        let decoded = updateValueCall::abi_decode(&bytes, true).unwrap();
        assert_eq!(decoded.dataFeedId, U256::from(3u8));
        assert_eq!(decoded.value, I256::try_from(1_000i64).unwrap());
        assert_eq!(call.to, oracle.to_checksum(None));
    }

    #[test]
    fn test_update_value_rejects_out_of_range() {
        let too_big = Numeric::from(1u8) << 300;
        assert!(matches!(
            update_value_call(Address::ZERO, &Numeric::from(1), &too_big),
            Err(EncodingError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_create_data_feed_call_encoding() {
        let hash = B256::repeat_byte(0xab);
        let call = create_data_feed_call(Address::ZERO, "Blue chips: ({})", hash);
        let bytes = hex::decode(call.data.trim_start_matches("0x")).unwrap();

        let decoded = createDataFeedCall::abi_decode(&bytes, true).unwrap();
        assert_eq!(decoded.nickname, "Blue chips: ({})");
        assert_eq!(decoded.rulesHash, hash);
    }

    #[test]
    fn test_decode_data_feed_info() {
        let info = DataFeedInfo {
            id: U256::from(9u8),
            nickname: "feed".to_string(),
            rulesHash: B256::repeat_byte(0x01),
            authorizedSender: Address::repeat_byte(0x02),
            latestValue: LatestValue {
                value: I256::try_from(5_000i64).unwrap(),
                timestamp: U256::from(1_700_000_000u64),
            },
        };
        let encoded = (info,).abi_encode_params();

        let state = decode_data_feed_info(&encoded).unwrap();
        assert_eq!(state.id, Numeric::from(9));
        assert_eq!(state.latest_value, Numeric::from(5_000));
        assert_eq!(state.latest_timestamp, 1_700_000_000);
        assert_eq!(state.rules_hash, B256::repeat_byte(0x01));
        assert_eq!(state.authorized_sender, Address::repeat_byte(0x02));
    }
}
