//! The module kinds every client starts with.
pub mod eth;
pub mod mungers;
pub mod net;
pub mod web3;

pub use eth::Eth;
pub use net::Net;
pub use web3::Web3;

use crate::module::{ModuleKind, ModuleSpec};

/// Kind of the client's root module. It binds nothing itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Root;

impl ModuleKind for Root {
    fn kind(&self) -> &'static str {
        "root"
    }
}

pub fn default_modules() -> Vec<(String, ModuleSpec)> {
    vec![
        ("eth".to_string(), ModuleSpec::bare(Eth)),
        ("net".to_string(), ModuleSpec::bare(Net)),
        ("web3".to_string(), ModuleSpec::bare(Web3)),
    ]
}
