use std::fmt::Debug;

use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a JSON-RPC error object.
    #[error("rpc error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Sends one JSON-RPC call and hands back the `result` member.
///
/// Implementations must be shareable across tasks; a single instance backs
/// every module of a client. Timeouts and retries belong here, not in the
/// module core.
pub trait Transport: Send + Sync + Debug {
    fn request<'a>(
        &'a self,
        method: &'a str,
        params: Vec<Value>,
    ) -> BoxFuture<'a, Result<Value, TransportError>>;

    /// Whether `method` can be served at all. Binding a method whose endpoint
    /// is refused here fails up front instead of at first call.
    fn supports(&self, _method: &str) -> bool {
        true
    }
}
