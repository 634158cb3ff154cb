use std::sync::Arc;

use anyhow::Context;

use crate::builtins::{default_modules, Root};
use crate::libs::config::Config;
use crate::libs::rpc::{EthDecoder, EthFormatter, HttpTransport, Transport};
use crate::module::{build, Module, ModuleSpec, RequestManager, Result};

/// A JSON-RPC client whose surface is a tree of [`Module`]s.
///
/// The root holds the built-in `eth`, `net` and `web3` modules plus whatever
/// external modules were supplied at construction; every module shares the
/// one [`RequestManager`] created here.
#[derive(Debug, Clone)]
pub struct Client {
    root: Arc<Module>,
    eth: Arc<Module>,
    net: Arc<Module>,
    web3: Arc<Module>,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self> {
        Self::with_external_modules(transport, Vec::<(String, ModuleSpec)>::new())
    }

    /// Params for the built-in endpoints are formatted by [`EthFormatter`] and
    /// their results decoded by [`EthDecoder`].
    pub fn with_external_modules<I, N>(transport: Arc<dyn Transport>, external_modules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, ModuleSpec)>,
        N: Into<String>,
    {
        let manager = RequestManager::new(transport)
            .with_formatter(Arc::new(EthFormatter))
            .with_decoder(Arc::new(EthDecoder));
        Self::with_manager(manager, external_modules)
    }

    /// External module names share the root namespace with the built-ins;
    /// reusing `eth`, `net` or `web3` fails the build.
    pub fn with_manager<I, N>(manager: RequestManager, external_modules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, ModuleSpec)>,
        N: Into<String>,
    {
        let mut children = default_modules();
        children.extend(external_modules.into_iter().map(|(n, s)| (n.into(), s)));
        let root = build(&ModuleSpec::Nested(Arc::new(Root), children), Arc::new(manager))?;

        Ok(Self {
            eth: root.get_submodule("eth")?,
            net: root.get_submodule("net")?,
            web3: root.get_submodule("web3")?,
            root,
        })
    }

    pub fn connect_http<I, N>(config: &Config, external_modules: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (N, ModuleSpec)>,
        N: Into<String>,
    {
        let url = config.rpc_url.as_deref().context("RPC_URL is not set")?;
        let transport = HttpTransport::new(url, config.timeout())?;
        let client = Self::with_external_modules(Arc::new(transport), external_modules)
            .with_context(|| format!("Failed to assemble modules for {url}"))?;
        Ok(client)
    }

    pub fn root(&self) -> &Arc<Module> {
        &self.root
    }

    pub fn eth(&self) -> &Arc<Module> {
        &self.eth
    }

    pub fn net(&self) -> &Arc<Module> {
        &self.net
    }

    pub fn web3(&self) -> &Arc<Module> {
        &self.web3
    }

    pub fn manager(&self) -> &Arc<RequestManager> {
        self.root.manager()
    }

    /// Module at a dotted path below the root, e.g. `module2.submodule1`.
    pub fn module(&self, path: &str) -> Result<Arc<Module>> {
        self.root.resolve(path)
    }

    pub fn attach_modules<I, N>(&self, specs: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, ModuleSpec)>,
        N: Into<String>,
    {
        self.root.attach_modules(specs)
    }

    /// Whether the node answers at all.
    pub async fn is_connected(&self) -> bool {
        self.web3.get("client_version").await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::rpc::TesterTransport;
    use crate::module::{Error, PlainModule};

    #[tokio::test]
    async fn builtins_share_the_root_manager() {
        let client = Client::new(Arc::new(TesterTransport::new())).unwrap();
        assert_eq!(client.root().submodule_names(), vec!["eth", "net", "web3"]);
        assert!(Arc::ptr_eq(client.eth().manager(), client.manager()));
        assert!(Arc::ptr_eq(client.web3().manager(), client.manager()));
        assert!(client.is_connected().await);
    }

    #[test]
    fn external_modules_cannot_reuse_builtin_names() {
        let err = Client::with_external_modules(
            Arc::new(TesterTransport::new()),
            [("eth", ModuleSpec::bare(PlainModule))],
        )
        .unwrap_err();
        assert!(matches!(err, Error::SpecBuild(_)));
    }

    #[test]
    fn connect_http_needs_a_url() {
        let config = Config {
            rpc_url: None,
            rpc_timeout_secs: 1,
        };
        assert!(Client::connect_http(&config, Vec::<(String, ModuleSpec)>::new()).is_err());

        let config = Config {
            rpc_url: Some("http://127.0.0.1:8545".to_string()),
            rpc_timeout_secs: 1,
        };
        let client = Client::connect_http(&config, [("tools", ModuleSpec::plain())]).unwrap();
        assert!(client.module("tools").is_ok());
    }
}
