//! Argument mungers shared by the built-in modules.
use alloy::primitives::Address;
use serde_json::{json, Value};

use crate::constants::{BLOCK_TAGS, DEFAULT_ACCOUNT_KEY, DEFAULT_BLOCK, DEFAULT_BLOCK_KEY};
use crate::module::munger::{arg, MungeResult, MungerContext, MungerError, Params};

/// Integers become hex quantities; tags and `0x` quantities pass through.
pub fn block_id(index: usize, raw: &Value) -> Result<Value, MungerError> {
    let invalid = || MungerError::invalid(index, "block identifier", raw);
    match raw {
        Value::Number(n) => n
            .as_u64()
            .map(|n| json!(format!("{n:#x}")))
            .ok_or_else(invalid),
        Value::String(s) if BLOCK_TAGS.contains(&s.as_str()) || is_quantity(s) => Ok(raw.clone()),
        _ => Err(invalid()),
    }
}

/// Checksummed or lowercase address, sent lowercase.
pub fn account(index: usize, raw: &Value) -> Result<Value, MungerError> {
    let addr: Address = raw
        .as_str()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| MungerError::invalid(index, "account", raw))?;
    Ok(json!(format!("{addr:#x}")))
}

/// `(account?, block?)` → `[account, block]`. Missing values come from the
/// module's `default_account` and `default_block`.
pub fn account_and_block(ctx: &MungerContext<'_>, params: Params) -> MungeResult {
    let account = match present(&params, 0) {
        Some(v) => account(0, v)?,
        None => {
            let fallback = ctx
                .default_value(DEFAULT_ACCOUNT_KEY)
                .ok_or_else(|| MungerError::missing(0, "account"))?;
            account(0, &fallback)?
        }
    };
    Ok(vec![account, block_or_default(ctx, &params, 1)?])
}

/// `(block_id?, full_transactions?)` → `[block_id, bool]`.
pub fn block_and_full(ctx: &MungerContext<'_>, params: Params) -> MungeResult {
    let id = block_or_default(ctx, &params, 0)?;
    Ok(vec![id, json!(full_transactions(&params, 1)?)])
}

/// `(block_hash, full_transactions?)` → `[block_hash, bool]`.
pub fn hash_and_full(params: Params) -> MungeResult {
    let raw = arg(&params, 0, "block hash")?;
    match raw.as_str() {
        Some(s) if s.len() == 66 && is_quantity(s) => {}
        _ => return Err(MungerError::invalid(0, "block hash", raw)),
    }
    Ok(vec![raw.clone(), json!(full_transactions(&params, 1)?)])
}

/// `(tx, block?)` → `[tx, block]`, filling `tx.from` from `default_account`.
pub fn transaction_and_block(ctx: &MungerContext<'_>, params: Params) -> MungeResult {
    let raw = arg(&params, 0, "transaction")?;
    let Value::Object(mut tx) = raw.clone() else {
        return Err(MungerError::invalid(0, "transaction", raw));
    };
    if !tx.contains_key("from") {
        if let Some(from) = ctx.default_value(DEFAULT_ACCOUNT_KEY) {
            tx.insert("from".to_string(), from);
        }
    }
    Ok(vec![Value::Object(tx), block_or_default(ctx, &params, 1)?])
}

/// Text is hex-encoded; `0x` byte strings pass through.
pub fn hex_data(params: Params) -> MungeResult {
    let raw = arg(&params, 0, "data")?;
    let s = raw
        .as_str()
        .ok_or_else(|| MungerError::invalid(0, "data", raw))?;
    let is_bytes = s
        .strip_prefix("0x")
        .is_some_and(|d| d.len() % 2 == 0 && d.chars().all(|c| c.is_ascii_hexdigit()));
    if is_bytes {
        return Ok(vec![raw.clone()]);
    }
    Ok(vec![json!(format!("0x{}", hex::encode(s.as_bytes())))])
}

fn present(params: &[Value], index: usize) -> Option<&Value> {
    params.get(index).filter(|v| !v.is_null())
}

fn block_or_default(
    ctx: &MungerContext<'_>,
    params: &[Value],
    index: usize,
) -> Result<Value, MungerError> {
    match present(params, index) {
        Some(v) => block_id(index, v),
        None => {
            let fallback = ctx
                .default_value(DEFAULT_BLOCK_KEY)
                .unwrap_or_else(|| json!(DEFAULT_BLOCK));
            block_id(index, &fallback)
        }
    }
}

fn full_transactions(params: &[Value], index: usize) -> Result<bool, MungerError> {
    match present(params, index) {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(MungerError::invalid(index, "full_transactions", other)),
    }
}

fn is_quantity(s: &str) -> bool {
    s.strip_prefix("0x")
        .is_some_and(|d| !d.is_empty() && d.chars().all(|c| c.is_ascii_hexdigit()))
}
