//! Runtime-extensible modules: descriptors, mungers, binding and the registry
//! that assembles a client's module tree.
pub mod error;
pub mod manager;
pub mod member;
pub mod method;
pub mod munger;
pub mod namespace;
pub mod registry;

pub use error::{Error, Result};
pub use manager::RequestManager;
pub use member::{bind, BoundMethod, BoundProperty, Member};
pub use method::Method;
pub use munger::{LeadingMunger, MungeResult, Munger, MungerContext, MungerError, Params, Pipeline};
pub use namespace::{Attr, Module};
pub use registry::{build, ModuleKind, ModuleSpec, PlainModule};

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::{Module, RequestManager};
    use crate::libs::rpc::{EthDecoder, EthFormatter, TesterTransport};

    pub(crate) fn tester_manager() -> (Arc<TesterTransport>, Arc<RequestManager>) {
        let transport = Arc::new(TesterTransport::new());
        let manager = RequestManager::new(transport.clone())
            .with_formatter(Arc::new(EthFormatter))
            .with_decoder(Arc::new(EthDecoder));
        (transport, Arc::new(manager))
    }

    /// A module outside any tree, backed by a fresh tester chain.
    pub(crate) fn detached(name: &str) -> (Arc<TesterTransport>, Arc<Module>) {
        let (transport, manager) = tester_manager();
        let module = Module::new(name, name.to_string(), "module", manager);
        (transport, Arc::new(module))
    }
}
