use serde_json::{json, Value};

use super::mungers::{account_and_block, block_and_full, hash_and_full, transaction_and_block};
use crate::constants::{DEFAULT_ACCOUNT_KEY, DEFAULT_BLOCK, DEFAULT_BLOCK_KEY};
use crate::module::{Method, ModuleKind};

/// The `eth` namespace: chain state reads over the standard endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eth;

impl ModuleKind for Eth {
    fn kind(&self) -> &'static str {
        "eth"
    }

    fn methods(&self) -> Vec<(&'static str, Method)> {
        vec![
            ("chain_id", Method::property("eth_chainId")),
            ("block_number", Method::property("eth_blockNumber")),
            ("coinbase", Method::property("eth_coinbase")),
            ("accounts", Method::property("eth_accounts")),
            ("gas_price", Method::property("eth_gasPrice")),
            (
                "get_balance",
                Method::new("eth_getBalance").with_leading_munger(account_and_block),
            ),
            (
                "get_transaction_count",
                Method::new("eth_getTransactionCount").with_leading_munger(account_and_block),
            ),
            (
                "get_block",
                Method::new("eth_getBlockByNumber").with_leading_munger(block_and_full),
            ),
            (
                "get_block_by_hash",
                Method::new("eth_getBlockByHash").with_munger(hash_and_full),
            ),
            (
                "call",
                Method::new("eth_call").with_leading_munger(transaction_and_block),
            ),
            (
                "estimate_gas",
                Method::new("eth_estimateGas").with_leading_munger(transaction_and_block),
            ),
        ]
    }

    fn defaults(&self) -> Vec<(&'static str, Value)> {
        vec![
            (DEFAULT_BLOCK_KEY, json!(DEFAULT_BLOCK)),
            (DEFAULT_ACCOUNT_KEY, Value::Null),
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::libs::rpc::TesterTransport;
    use crate::Client;

    #[tokio::test]
    async fn properties_decode_quantities() {
        let client = Client::new(Arc::new(TesterTransport::new())).unwrap();
        let eth = client.eth();
        assert_eq!(eth.get("chain_id").await.unwrap(), json!(61));
        assert_eq!(eth.get("block_number").await.unwrap(), json!(0));
        assert_eq!(eth.get("gas_price").await.unwrap(), json!(875_000_000u64));
        assert_eq!(
            eth.get("coinbase").await.unwrap(),
            json!(format!("{:#x}", ethtester::COINBASE))
        );
        assert_eq!(eth.get("accounts").await.unwrap().as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn blocks_by_number_and_hash() {
        let transport = Arc::new(TesterTransport::new());
        let client = Client::new(transport.clone()).unwrap();
        let eth = client.eth();

        let latest = eth.call("get_block", vec![json!("latest")]).await.unwrap();
        assert_eq!(latest["number"], json!(0));
        assert_eq!(
            transport.last_request().await.unwrap().params,
            vec![json!("latest"), json!(false)]
        );

        let by_hash = eth
            .call("get_block_by_hash", vec![latest["hash"].clone()])
            .await
            .unwrap();
        assert_eq!(by_hash, latest);

        let one = eth.call("get_block", vec![json!(1)]).await.unwrap();
        assert_eq!(one["baseFeePerGas"], json!(875_000_000u64));
        assert_eq!(transport.last_request().await.unwrap().params[0], json!("0x1"));
    }

    #[tokio::test]
    async fn default_account_feeds_balance_and_call() {
        let transport = Arc::new(TesterTransport::new());
        let client = Client::new(transport.clone()).unwrap();
        let eth = client.eth();
        let coinbase = eth.get("coinbase").await.unwrap();

        eth.set_default("default_account", coinbase.clone());
        let balance = eth.call("get_balance", vec![]).await.unwrap();
        assert_eq!(balance, json!("1000000000000000000000000"));

        eth.call("call", vec![json!({"to": coinbase})]).await.unwrap();
        let sent = transport.last_request().await.unwrap();
        assert_eq!(sent.method, "eth_call");
        assert_eq!(sent.params[0]["from"], coinbase);

        assert_eq!(eth.call("get_transaction_count", vec![]).await.unwrap(), json!(0));
        assert_eq!(
            eth.call("estimate_gas", vec![json!({"to": coinbase})]).await.unwrap(),
            json!(21_000)
        );
    }
}
