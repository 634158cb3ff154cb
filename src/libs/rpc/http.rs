//! JSON-RPC 2.0 over HTTP with `reqwest`.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::BoxFuture;
use reqwest::Client as HttpClient;
use serde_json::Value;
use url::Url;

use super::transport::{Transport, TransportError};
use crate::constants::LOG_RESULT_CHARS;
use crate::libs::trail::{save_log_to_file, trim_chars};

/// Posts one request envelope per call. Request ids increase monotonically
/// per transport so responses in the debug trail can be matched up.
#[derive(Debug)]
pub struct HttpTransport {
    rpc_url: Url,
    http: HttpClient,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self> {
        let url = Url::parse(rpc_url)
            .with_context(|| format!("Failed to parse RPC_URL: {rpc_url}"))?;
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            rpc_url: url,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.rpc_url
    }

    async fn send(&self, method: &str, params: Vec<Value>) -> Result<Value, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        save_log_to_file(&format!("[http] -> #{id} {method}"));

        let res = self
            .http
            .post(self.rpc_url.as_str())
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let bytes = res.bytes().await?;

        let v: Value = match serde_json::from_slice(&bytes) {
            Ok(json) => json,
            Err(e) => {
                let sample = trim_chars(&String::from_utf8_lossy(&bytes), 512);
                // usual suspects: an HTML gateway page, or a ws:// endpoint given as http
                let hint = if sample.trim_start().starts_with('<') {
                    "Response looks like HTML; RPC_URL may point at a gateway page rather than a JSON-RPC endpoint."
                } else if sample.trim().is_empty() {
                    "Empty body from RPC. Endpoint may be down or require authentication."
                } else {
                    "Non-JSON response from RPC."
                };
                return Err(TransportError::InvalidResponse(format!(
                    "decode error ({status}): {e}. {hint} Endpoint: {} Sample: {sample}",
                    self.rpc_url
                )));
            }
        };

        if let Some(err) = v.get("error") {
            save_log_to_file(&format!("[http] <- #{id} error {err}"));
            return Err(rpc_error(err));
        }
        let result = v.get("result").cloned().unwrap_or(Value::Null);
        save_log_to_file(&format!(
            "[http] <- #{id} {}",
            trim_chars(&result.to_string(), *LOG_RESULT_CHARS)
        ));
        Ok(result)
    }
}

impl Transport for HttpTransport {
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Vec<Value>,
    ) -> BoxFuture<'a, Result<Value, TransportError>> {
        Box::pin(self.send(method, params))
    }
}

/// Map a JSON-RPC error object. Nodes are not always strict about its shape,
/// so missing members degrade to defaults rather than failing.
fn rpc_error(err: &Value) -> TransportError {
    TransportError::Rpc {
        code: err.get("code").and_then(Value::as_i64).unwrap_or(-32603),
        message: err
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string()),
        data: err.get("data").cloned(),
    }
}
