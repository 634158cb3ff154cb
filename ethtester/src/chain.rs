use std::collections::HashMap;

use alloy::primitives::{keccak256, Address, U256};
use serde_json::{json, Value};

use crate::addresses::{genesis_balance, CHAIN_ID, COINBASE, FUNDED_ACCOUNTS};
use crate::blocks::Block;
use crate::error::TesterError;
use crate::quantity::{parse_quantity, to_quantity};

pub const SUPPORTED_METHODS: [&str; 16] = [
    "eth_chainId",
    "eth_blockNumber",
    "eth_coinbase",
    "eth_accounts",
    "eth_gasPrice",
    "eth_getBalance",
    "eth_getTransactionCount",
    "eth_getBlockByNumber",
    "eth_getBlockByHash",
    "eth_call",
    "eth_estimateGas",
    "net_version",
    "net_peerCount",
    "net_listening",
    "web3_clientVersion",
    "web3_sha3",
];

/// In-memory chain answering the read-only slice of the Ethereum JSON-RPC API.
///
/// Genesis is mined as block 0 and block 1 is pending. Every funded account
/// starts with [`genesis_balance`] wei and nothing ever moves it.
#[derive(Debug, Clone)]
pub struct EthTester {
    mined: Vec<Block>,
    pending: Block,
    balances: HashMap<Address, U256>,
}

impl Default for EthTester {
    fn default() -> Self {
        Self::new()
    }
}

impl EthTester {
    pub fn new() -> Self {
        let genesis = Block::genesis();
        let pending = genesis.child();
        let balances = FUNDED_ACCOUNTS
            .iter()
            .map(|a| (*a, genesis_balance()))
            .collect();
        Self {
            mined: vec![genesis],
            pending,
            balances,
        }
    }

    pub fn supports(&self, method: &str) -> bool {
        SUPPORTED_METHODS.contains(&method)
    }

    pub fn latest(&self) -> &Block {
        // `mined` always holds genesis.
        &self.mined[self.mined.len() - 1]
    }

    pub fn pending(&self) -> &Block {
        &self.pending
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or(U256::ZERO)
    }

    /// Seal the pending block and open a new empty one on top of it.
    pub fn mine(&mut self) -> &Block {
        let next = self.pending.child();
        let sealed = std::mem::replace(&mut self.pending, next);
        self.mined.push(sealed);
        self.latest()
    }

    /// Serve one JSON-RPC call.
    pub fn handle(&self, method: &str, params: &[Value]) -> Result<Value, TesterError> {
        match method {
            "eth_chainId" => Ok(json!(to_quantity(CHAIN_ID))),
            "eth_blockNumber" => Ok(json!(to_quantity(self.latest().number))),
            "eth_coinbase" => Ok(json!(format!("{COINBASE:#x}"))),
            "eth_accounts" => Ok(Value::Array(
                FUNDED_ACCOUNTS
                    .iter()
                    .map(|a| json!(format!("{a:#x}")))
                    .collect(),
            )),
            "eth_gasPrice" => Ok(json!(to_quantity(self.pending.base_fee_per_gas))),
            "eth_getBalance" => {
                let account = account_param(method, params.first())?;
                self.require_block(method, params.get(1))?;
                Ok(json!(to_quantity(self.balance_of(account))))
            }
            "eth_getTransactionCount" => {
                account_param(method, params.first())?;
                self.require_block(method, params.get(1))?;
                Ok(json!(to_quantity(0u64)))
            }
            "eth_getBlockByNumber" => {
                let id = params
                    .first()
                    .ok_or_else(|| TesterError::invalid_params(method, "missing block id"))?;
                let number = self.block_number(method, Some(id))?;
                Ok(self.block(number).map(Block::to_json).unwrap_or(Value::Null))
            }
            "eth_getBlockByHash" => {
                let raw = params
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| TesterError::invalid_params(method, "missing block hash"))?;
                let found = self
                    .mined
                    .iter()
                    .chain(std::iter::once(&self.pending))
                    .find(|b| format!("{:#x}", b.hash).eq_ignore_ascii_case(raw));
                Ok(found.map(Block::to_json).unwrap_or(Value::Null))
            }
            "eth_call" => {
                match params.first() {
                    Some(Value::Object(_)) => {}
                    _ => return Err(TesterError::invalid_params(method, "expected a call object")),
                }
                self.require_block(method, params.get(1))?;
                Ok(json!("0x"))
            }
            "eth_estimateGas" => Ok(json!(to_quantity(21_000u64))),
            "net_version" => Ok(json!(CHAIN_ID.to_string())),
            "net_peerCount" => Ok(json!(to_quantity(0u64))),
            "net_listening" => Ok(json!(false)),
            "web3_clientVersion" => Ok(json!(format!(
                "EthereumTester/{}/rust",
                env!("CARGO_PKG_VERSION")
            ))),
            "web3_sha3" => {
                let data = params
                    .first()
                    .and_then(Value::as_str)
                    .ok_or_else(|| TesterError::invalid_params(method, "missing data"))?;
                let bytes = hex::decode(data.trim_start_matches("0x"))
                    .map_err(|e| TesterError::invalid_params(method, format!("bad hex: {e}")))?;
                Ok(json!(format!("{:#x}", keccak256(&bytes))))
            }
            other => Err(TesterError::MethodNotFound(other.to_string())),
        }
    }

    fn block(&self, number: u64) -> Option<&Block> {
        if number == self.pending.number {
            return Some(&self.pending);
        }
        self.mined.get(number as usize)
    }

    /// Resolve a block identifier to a number. Tags and hex quantities are
    /// accepted; bare JSON integers are not, same as a real node. A missing
    /// identifier means `latest`.
    fn block_number(&self, method: &str, id: Option<&Value>) -> Result<u64, TesterError> {
        let latest = self.latest().number;
        match id {
            None | Some(Value::Null) => Ok(latest),
            Some(Value::String(s)) => match s.as_str() {
                "latest" | "safe" | "finalized" => Ok(latest),
                "earliest" => Ok(0),
                "pending" => Ok(self.pending.number),
                raw => parse_quantity(raw)
                    .and_then(|q| u64::try_from(q).ok())
                    .ok_or_else(|| {
                        TesterError::invalid_params(method, format!("bad block id `{raw}`"))
                    }),
            },
            Some(other) => Err(TesterError::invalid_params(
                method,
                format!("bad block id {other}"),
            )),
        }
    }

    fn require_block(&self, method: &str, id: Option<&Value>) -> Result<(), TesterError> {
        let number = self.block_number(method, id)?;
        if self.block(number).is_none() {
            return Err(TesterError::invalid_params(
                method,
                format!("unknown block {number}"),
            ));
        }
        Ok(())
    }
}

fn account_param(method: &str, raw: Option<&Value>) -> Result<Address, TesterError> {
    raw.and_then(Value::as_str)
        .ok_or_else(|| TesterError::invalid_params(method, "missing account"))?
        .parse::<Address>()
        .map_err(|e| TesterError::invalid_params(method, format!("bad account: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(tester: &EthTester, method: &str, params: Value) -> Result<Value, TesterError> {
        let params = params.as_array().cloned().unwrap_or_default();
        tester.handle(method, &params)
    }

    #[test]
    fn genesis_state() {
        let t = EthTester::new();
        assert_eq!(call(&t, "eth_chainId", json!([])).unwrap(), "0x3d");
        assert_eq!(call(&t, "eth_blockNumber", json!([])).unwrap(), "0x0");
        assert_eq!(call(&t, "net_version", json!([])).unwrap(), "61");

        let coinbase = call(&t, "eth_coinbase", json!([])).unwrap();
        let balance = call(&t, "eth_getBalance", json!([coinbase, "latest"])).unwrap();
        assert_eq!(balance, "0xd3c21bcecceda1000000");
    }

    #[test]
    fn blocks_by_tag_number_and_hash() {
        let t = EthTester::new();
        let latest = call(&t, "eth_getBlockByNumber", json!(["latest", false])).unwrap();
        let pending = call(&t, "eth_getBlockByNumber", json!(["pending"])).unwrap();
        assert_eq!(latest["number"], "0x0");
        assert_eq!(pending["number"], "0x1");
        assert_eq!(pending["parentHash"], latest["hash"]);

        let one = call(&t, "eth_getBlockByNumber", json!(["0x1"])).unwrap();
        assert_eq!(one, pending);

        let by_hash = call(&t, "eth_getBlockByHash", json!([latest["hash"]])).unwrap();
        assert_eq!(by_hash, latest);

        let future = call(&t, "eth_getBlockByNumber", json!(["0x9"])).unwrap();
        assert!(future.is_null());
    }

    #[test]
    fn mining_advances_head() {
        let mut t = EthTester::new();
        let sealed = t.mine().clone();
        assert_eq!(sealed.number, 1);
        assert_eq!(t.pending().number, 2);
        assert_eq!(call(&t, "eth_blockNumber", json!([])).unwrap(), "0x1");
    }

    #[test]
    fn errors_carry_json_rpc_codes() {
        let t = EthTester::new();
        let err = call(&t, "eth_unknown", json!([])).unwrap_err();
        assert_eq!(err.code(), -32601);
        assert!(!t.supports("eth_unknown"));

        let err = call(&t, "eth_getBalance", json!(["not-an-address"])).unwrap_err();
        assert_eq!(err.code(), -32602);

        let err = call(&t, "eth_getBlockByNumber", json!([true])).unwrap_err();
        assert_eq!(err.code(), -32602);

        // block numbers must be hex quantities on the wire
        let err = call(&t, "eth_getBlockByNumber", json!([1, false])).unwrap_err();
        assert_eq!(err.code(), -32602);
        let err = call(&t, "eth_getBalance", json!([format!("{COINBASE:#x}"), 0])).unwrap_err();
        assert_eq!(err.code(), -32602);
    }

    #[test]
    fn sha3_hashes_hex_input() {
        let t = EthTester::new();
        let hash = call(&t, "web3_sha3", json!(["0x"])).unwrap();
        assert_eq!(
            hash,
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }
}
