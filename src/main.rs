use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use w3mod::constants::LOG_RESULT_CHARS;
use w3mod::libs::config::{load_env, Config};
use w3mod::libs::rpc::TesterTransport;
use w3mod::libs::trail::trim_chars;
use w3mod::libs::writing::cc;
use w3mod::module::munger::{arg_u64, MungeResult, Params};
use w3mod::{log, warn, Client, Method, ModuleSpec, PlainModule};

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    let config = Config::new();

    let external = [(
        "tools",
        ModuleSpec::nested(PlainModule, [("blocks", ModuleSpec::plain())]),
    )];
    let client = match &config.rpc_url {
        Some(url) => {
            log!(cc::CYAN, "connecting to {}", url);
            Client::connect_http(&config, external)?
        }
        None => {
            warn!("RPC_URL not set; using the in-process tester chain");
            Client::with_external_modules(Arc::new(TesterTransport::new()), external)?
        }
    };

    client.module("tools")?.attach_methods([
        ("chain", Method::property("eth_chainId")),
        (
            "previous_block",
            Method::new("eth_getBlockByNumber").with_munger(previous_block),
        ),
    ])?;
    client
        .module("tools.blocks")?
        .attach_method("head", Method::property("eth_blockNumber"))?;

    let chain_id = client.eth().get("chain_id").await.context("eth.chain_id")?;
    show("eth.chain_id", &chain_id);
    let tools = client.module("tools")?;
    show("tools.chain", &tools.get("chain").await?);

    let head = client.module("tools.blocks")?.get("head").await?;
    show("tools.blocks.head", &head);

    let number = head.as_u64().unwrap_or_default();
    let parent = tools
        .call("previous_block", vec![json!(number + 1)])
        .await
        .context("tools.previous_block")?;
    show("tools.previous_block", &parent);

    let coinbase = client.eth().get("coinbase").await?;
    if !coinbase.is_null() {
        let balance = client
            .eth()
            .call("get_balance", vec![coinbase])
            .await?;
        show("eth.get_balance(coinbase)", &balance);
    }
    Ok(())
}

/// `(n, ..)` → block `n - 1`, hashes only.
fn previous_block(args: Params) -> MungeResult {
    let n = arg_u64(&args, 0, "block number")?;
    Ok(vec![json!(format!("{:#x}", n.saturating_sub(1))), json!(false)])
}

fn show(label: &str, value: &Value) {
    log!(
        cc::LIGHT_GREEN,
        "{:<28} {}",
        label,
        trim_chars(&value.to_string(), *LOG_RESULT_CHARS)
    );
}
