use thiserror::Error;

/// Failures reported by the tester chain, shaped after JSON-RPC error objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TesterError {
    #[error("the method {0} does not exist/is not available")]
    MethodNotFound(String),
    #[error("invalid params for {method}: {reason}")]
    InvalidParams { method: String, reason: String },
}

impl TesterError {
    pub fn invalid_params(method: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            method: method.to_string(),
            reason: reason.into(),
        }
    }

    /// JSON-RPC 2.0 error code.
    pub fn code(&self) -> i64 {
        match self {
            Self::MethodNotFound(_) => -32601,
            Self::InvalidParams { .. } => -32602,
        }
    }
}
