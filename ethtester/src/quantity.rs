//! Hex quantity helpers for the `0x`-prefixed encoding used on the wire.
use std::fmt::LowerHex;

use alloy::primitives::U256;

/// Encode as a minimal hex quantity: `0` is `"0x0"`, no leading zeros.
pub fn to_quantity<T: LowerHex>(value: T) -> String {
    format!("{value:#x}")
}

/// Parse a `0x` quantity. Rejects empty digits and a missing prefix.
pub fn parse_quantity(raw: &str) -> Option<U256> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    U256::from_str_radix(digits, 16).ok()
}
