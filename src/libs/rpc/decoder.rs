//! Per-endpoint result decoding.
//!
//! Decoding is keyed by RPC endpoint, not by the bound member, so any method
//! pointed at `eth_chainId` sees the same value as the built-in `chain_id`.
use std::fmt::Debug;

use alloy::primitives::U256;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

pub trait ResponseDecoder: Send + Sync + Debug {
    fn decode(&self, endpoint: &str, raw: Value) -> Result<Value, DecodeError>;
}

/// Decodes hex quantities for the Ethereum endpoints the built-ins use.
///
/// Quantities become JSON numbers, or decimal strings when they do not fit a
/// `u64` (balances routinely don't). Unknown endpoints pass through as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthDecoder;

const QUANTITY_ENDPOINTS: [&str; 7] = [
    "eth_chainId",
    "eth_blockNumber",
    "eth_gasPrice",
    "eth_getBalance",
    "eth_getTransactionCount",
    "eth_estimateGas",
    "net_peerCount",
];

const BLOCK_ENDPOINTS: [&str; 2] = ["eth_getBlockByNumber", "eth_getBlockByHash"];

const BLOCK_QUANTITY_FIELDS: [&str; 7] = [
    "number",
    "baseFeePerGas",
    "gasLimit",
    "gasUsed",
    "timestamp",
    "size",
    "difficulty",
];

impl ResponseDecoder for EthDecoder {
    fn decode(&self, endpoint: &str, raw: Value) -> Result<Value, DecodeError> {
        if QUANTITY_ENDPOINTS.contains(&endpoint) {
            return decode_quantity(raw);
        }
        if BLOCK_ENDPOINTS.contains(&endpoint) {
            return match raw {
                Value::Object(block) => decode_block(block).map(Value::Object),
                other => Ok(other),
            };
        }
        Ok(raw)
    }
}

fn decode_block(mut block: Map<String, Value>) -> Result<Map<String, Value>, DecodeError> {
    for field in BLOCK_QUANTITY_FIELDS {
        if let Some(v) = block.remove(field) {
            let decoded =
                decode_quantity(v).map_err(|e| DecodeError(format!("block.{field}: {}", e.0)))?;
            block.insert(field.to_string(), decoded);
        }
    }
    Ok(block)
}

/// `"0x3d"` becomes `61`. Values that are not strings are left alone.
pub fn decode_quantity(raw: Value) -> Result<Value, DecodeError> {
    let Value::String(s) = raw else {
        return Ok(raw);
    };
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .filter(|d| !d.is_empty())
        .ok_or_else(|| DecodeError(format!("`{s}` is not a hex quantity")))?;
    let value = U256::from_str_radix(digits, 16)
        .map_err(|e| DecodeError(format!("`{s}` is not a hex quantity: {e}")))?;
    Ok(match u64::try_from(value) {
        Ok(small) => Value::from(small),
        Err(_) => Value::String(value.to_string()),
    })
}
