use crate::module::{Method, ModuleKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct Net;

impl ModuleKind for Net {
    fn kind(&self) -> &'static str {
        "net"
    }

    fn methods(&self) -> Vec<(&'static str, Method)> {
        vec![
            ("version", Method::property("net_version")),
            ("peer_count", Method::property("net_peerCount")),
            ("listening", Method::property("net_listening")),
        ]
    }
}
