//! Per-endpoint request formatting, the outbound side of [`super::decoder`].
//!
//! Runs on the final params after the munger pipeline, so a custom method
//! pointed at `eth_getBlockByNumber` puts the same thing on the wire as the
//! built-in `get_block`.
use std::fmt::Debug;

use serde_json::Value;

pub trait RequestFormatter: Send + Sync + Debug {
    fn format(&self, endpoint: &str, params: Vec<Value>) -> Vec<Value>;
}

/// Hex-encodes integer block identifiers for the Ethereum endpoints that take
/// one. Tags, quantities and anything else are sent untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthFormatter;

const BLOCK_ID_POSITIONS: [(&str, usize); 5] = [
    ("eth_getBlockByNumber", 0),
    ("eth_getBalance", 1),
    ("eth_getTransactionCount", 1),
    ("eth_call", 1),
    ("eth_estimateGas", 1),
];

impl RequestFormatter for EthFormatter {
    fn format(&self, endpoint: &str, mut params: Vec<Value>) -> Vec<Value> {
        let Some((_, index)) = BLOCK_ID_POSITIONS.iter().find(|(e, _)| *e == endpoint) else {
            return params;
        };
        if let Some(slot) = params.get_mut(*index) {
            if let Some(n) = slot.as_u64() {
                *slot = Value::String(format!("{n:#x}"));
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_block_ids_become_quantities() {
        let f = EthFormatter;
        assert_eq!(f.format("eth_getBlockByNumber", vec![json!(0)]), vec![json!("0x0")]);
        assert_eq!(
            f.format("eth_getBlockByNumber", vec![json!(255), json!(true)]),
            vec![json!("0xff"), json!(true)]
        );
        assert_eq!(
            f.format("eth_getBalance", vec![json!("0xab"), json!(16)]),
            vec![json!("0xab"), json!("0x10")]
        );
    }

    #[test]
    fn everything_else_is_untouched() {
        let f = EthFormatter;
        let tagged = vec![json!("pending"), json!(false)];
        assert_eq!(f.format("eth_getBlockByNumber", tagged.clone()), tagged);
        // only the block slot is rewritten
        assert_eq!(f.format("eth_getBalance", vec![json!(7)]), vec![json!(7)]);
        assert_eq!(f.format("eth_chainId", vec![json!(1)]), vec![json!(1)]);
        assert!(f.format("eth_getBlockByNumber", vec![]).is_empty());
        assert_eq!(f.format("eth_getBlockByNumber", vec![json!(-1)]), vec![json!(-1)]);
    }
}
