use alloy::primitives::{keccak256, B256};
use serde_json::{json, Value};

use crate::addresses::COINBASE;
use crate::quantity::to_quantity;

pub const GENESIS_BASE_FEE: u64 = 1_000_000_000;
pub const GAS_LIMIT: u64 = 30_000_000;
pub const GENESIS_TIMESTAMP: u64 = 1_700_000_000;
pub const BLOCK_TIME_SECS: u64 = 12;

/// Elasticity divisor from EIP-1559.
const BASE_FEE_CHANGE_DENOMINATOR: u128 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub base_fee_per_gas: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: u64,
}

impl Block {
    pub fn genesis() -> Self {
        Self::sealed(0, B256::ZERO, GENESIS_BASE_FEE, GENESIS_TIMESTAMP)
    }

    /// The block built on top of `self`, with no transactions.
    pub fn child(&self) -> Self {
        Self::sealed(
            self.number + 1,
            self.hash,
            next_base_fee(self.base_fee_per_gas, self.gas_used, self.gas_limit),
            self.timestamp + BLOCK_TIME_SECS,
        )
    }

    fn sealed(number: u64, parent_hash: B256, base_fee_per_gas: u64, timestamp: u64) -> Self {
        let mut preimage = Vec::with_capacity(40);
        preimage.extend_from_slice(&number.to_be_bytes());
        preimage.extend_from_slice(parent_hash.as_slice());
        Self {
            number,
            hash: keccak256(&preimage),
            parent_hash,
            base_fee_per_gas,
            gas_limit: GAS_LIMIT,
            gas_used: 0,
            timestamp,
        }
    }

    /// JSON-RPC block object. Blocks carry no transactions, so hashes and
    /// full objects render the same empty list.
    pub fn to_json(&self) -> Value {
        let transactions: Vec<Value> = Vec::new();
        json!({
            "number": to_quantity(self.number),
            "hash": format!("{:#x}", self.hash),
            "parentHash": format!("{:#x}", self.parent_hash),
            "miner": format!("{:#x}", COINBASE),
            "baseFeePerGas": to_quantity(self.base_fee_per_gas),
            "gasLimit": to_quantity(self.gas_limit),
            "gasUsed": to_quantity(self.gas_used),
            "timestamp": to_quantity(self.timestamp),
            "transactions": transactions,
        })
    }
}

/// EIP-1559 base fee of the block following a parent with the given usage.
pub fn next_base_fee(base_fee: u64, gas_used: u64, gas_limit: u64) -> u64 {
    let target = (gas_limit / 2) as u128;
    let base = base_fee as u128;
    let used = gas_used as u128;
    if target == 0 || used == target {
        return base_fee;
    }
    if used > target {
        let delta = (base * (used - target) / target / BASE_FEE_CHANGE_DENOMINATOR).max(1);
        (base + delta).min(u64::MAX as u128) as u64
    } else {
        let delta = base * (target - used) / target / BASE_FEE_CHANGE_DENOMINATOR;
        (base - delta) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_block_lowers_base_fee_by_an_eighth() {
        assert_eq!(next_base_fee(GENESIS_BASE_FEE, 0, GAS_LIMIT), 875_000_000);
        assert_eq!(next_base_fee(GENESIS_BASE_FEE, GAS_LIMIT / 2, GAS_LIMIT), GENESIS_BASE_FEE);
        assert_eq!(next_base_fee(GENESIS_BASE_FEE, GAS_LIMIT, GAS_LIMIT), 1_125_000_000);
    }

    #[test]
    fn child_links_to_parent() {
        let genesis = Block::genesis();
        let next = genesis.child();
        assert_eq!(next.number, 1);
        assert_eq!(next.parent_hash, genesis.hash);
        assert_ne!(next.hash, genesis.hash);
        assert_eq!(next.base_fee_per_gas, 875_000_000);

        let obj = next.to_json();
        assert_eq!(obj["number"], "0x1");
        assert_eq!(obj["baseFeePerGas"], "0x342770c0");
    }
}
