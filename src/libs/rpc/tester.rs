use ethtester::EthTester;
use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::sync::Mutex;

use super::transport::{Transport, TransportError};
use crate::libs::trail::save_log_to_file;

/// One call as the transport received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub params: Vec<Value>,
}

/// Serves calls from an in-process [`EthTester`] chain and records each
/// request, so callers can check exactly what reached the wire.
#[derive(Debug, Default)]
pub struct TesterTransport {
    chain: EthTester,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl TesterTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(chain: EthTester) -> Self {
        Self {
            chain,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn chain(&self) -> &EthTester {
        &self.chain
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Transport for TesterTransport {
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Vec<Value>,
    ) -> BoxFuture<'a, Result<Value, TransportError>> {
        Box::pin(async move {
            save_log_to_file(&format!("[tester] {method} {}", Value::Array(params.clone())));
            let outcome = self.chain.handle(method, &params);
            self.requests.lock().await.push(RecordedRequest {
                method: method.to_string(),
                params,
            });
            outcome.map_err(|e| TransportError::Rpc {
                code: e.code(),
                message: e.to_string(),
                data: None,
            })
        })
    }

    fn supports(&self, method: &str) -> bool {
        self.chain.supports(method)
    }
}
