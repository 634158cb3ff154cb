use serde_json::Value;

use super::error::Result;
use super::munger::{LeadingMunger, MungeResult, Munger, MungerContext, Params, Pipeline};

/// Declarative description of a bindable member: which endpoint to call, how
/// to munge arguments on the way, and whether it reads like a property.
///
/// ```
/// use serde_json::json;
/// use w3mod::module::{munger::arg_u64, Method};
///
/// let chain_id = Method::property("eth_chainId");
/// assert!(chain_id.is_property());
///
/// let previous_block = Method::new("eth_getBlockByNumber")
///     .with_munger(|args| Ok(vec![json!(arg_u64(&args, 0, "block")?.saturating_sub(1))]));
/// assert_eq!(previous_block.pipeline().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Method {
    rpc_endpoint: String,
    pipeline: Pipeline,
    is_property: bool,
}

impl Method {
    pub fn new(rpc_endpoint: impl Into<String>) -> Self {
        Self {
            rpc_endpoint: rpc_endpoint.into(),
            pipeline: Pipeline::new(),
            is_property: false,
        }
    }

    /// A zero-argument member read with `get` rather than `call`.
    pub fn property(rpc_endpoint: impl Into<String>) -> Self {
        Self::new(rpc_endpoint).as_property()
    }

    pub fn as_property(mut self) -> Self {
        self.is_property = true;
        self
    }

    /// Set the context-aware first step. It must come before any plain
    /// munger; a descriptor that declares it later fails to bind. Setting it
    /// twice keeps the last one.
    pub fn with_leading_munger<F>(mut self, f: F) -> Self
    where
        F: Fn(&MungerContext<'_>, Params) -> MungeResult + Send + Sync + 'static,
    {
        self.pipeline.set_leading(LeadingMunger::new(f));
        self
    }

    pub fn with_munger<F>(mut self, f: F) -> Self
    where
        F: Fn(Params) -> MungeResult + Send + Sync + 'static,
    {
        self.pipeline.push(Munger::new(f));
        self
    }

    pub fn with_mungers<I>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = Munger>,
    {
        for step in steps {
            self.pipeline.push(step);
        }
        self
    }

    pub fn rpc_endpoint(&self) -> &str {
        &self.rpc_endpoint
    }

    pub fn is_property(&self) -> bool {
        self.is_property
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Params this descriptor would send for `args`, without sending them.
    pub fn munge(&self, ctx: &MungerContext<'_>, args: Vec<Value>) -> Result<Params> {
        self.pipeline.apply(ctx, args)
    }
}
