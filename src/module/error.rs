use thiserror::Error;

use crate::libs::rpc::TransportError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything an attach, build or invocation can fail with.
///
/// Nothing here is logged or retried by the module core; each variant reaches
/// the caller as produced.
#[derive(Debug, Error)]
pub enum Error {
    #[error("`{module}` has no member or submodule named `{name}`")]
    UnknownMember { module: String, name: String },

    /// A munger step rejected its input; no request was sent.
    #[error("munger failed for `{endpoint}`: {reason}")]
    MungerFailure { endpoint: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed module spec: {0}")]
    SpecBuild(String),

    #[error("transport cannot serve `{endpoint}`")]
    UnsupportedEndpoint { endpoint: String },

    #[error("munger pipeline for `{endpoint}` is invalid: {reason}")]
    InvalidPipeline { endpoint: String, reason: String },

    #[error("`{name}` is a property; read it with `get`")]
    NotCallable { name: String },

    #[error("`{name}` is a method; invoke it with `call`")]
    NotProperty { name: String },

    #[error("could not decode `{endpoint}` result: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl Error {
    pub(crate) fn decode(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            reason: err.to_string(),
        }
    }
}
