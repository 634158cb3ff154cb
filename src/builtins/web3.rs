use super::mungers::hex_data;
use crate::module::{Method, ModuleKind};

/// Node-level helpers that are not chain reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Web3;

impl ModuleKind for Web3 {
    fn kind(&self) -> &'static str {
        "web3"
    }

    fn methods(&self) -> Vec<(&'static str, Method)> {
        vec![
            ("client_version", Method::property("web3_clientVersion")),
            ("sha3", Method::new("web3_sha3").with_munger(hex_data)),
        ]
    }
}
