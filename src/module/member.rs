//! Binding descriptors to a transport handle.
use std::sync::Arc;

use serde_json::Value;

use super::error::{Error, Result};
use super::manager::RequestManager;
use super::method::Method;
use super::munger::{MungerContext, Params};
use super::namespace::Module;

/// Something a module can hold under a name. Both variants share the same
/// invocation path: munge, send, decode.
#[derive(Clone, Debug)]
pub enum Member {
    Method(BoundMethod),
    Property(BoundProperty),
}

impl Member {
    pub fn descriptor(&self) -> &Method {
        match self {
            Self::Method(m) => &m.descriptor,
            Self::Property(p) => &p.descriptor,
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(self, Self::Property(_))
    }
}

#[derive(Clone, Debug)]
pub struct BoundMethod {
    descriptor: Arc<Method>,
    manager: Arc<RequestManager>,
}

impl BoundMethod {
    pub fn descriptor(&self) -> &Method {
        &self.descriptor
    }

    pub async fn call(&self, module: &Module, args: Params) -> Result<Value> {
        invoke(&self.descriptor, &self.manager, module, args).await
    }
}

/// Zero-argument accessor. Every read goes to the transport; nothing is cached.
#[derive(Clone, Debug)]
pub struct BoundProperty {
    descriptor: Arc<Method>,
    manager: Arc<RequestManager>,
}

impl BoundProperty {
    pub fn descriptor(&self) -> &Method {
        &self.descriptor
    }

    pub async fn get(&self, module: &Module) -> Result<Value> {
        invoke(&self.descriptor, &self.manager, module, Vec::new()).await
    }
}

/// Bind `descriptor` to the shared transport handle. No I/O happens here; it
/// fails only for a misordered pipeline or an endpoint the transport refuses.
pub fn bind(descriptor: Method, manager: &Arc<RequestManager>) -> Result<Member> {
    descriptor
        .pipeline()
        .validate()
        .map_err(|e| Error::InvalidPipeline {
            endpoint: descriptor.rpc_endpoint().to_string(),
            reason: e.to_string(),
        })?;
    if !manager.supports(descriptor.rpc_endpoint()) {
        return Err(Error::UnsupportedEndpoint {
            endpoint: descriptor.rpc_endpoint().to_string(),
        });
    }
    let is_property = descriptor.is_property();
    let descriptor = Arc::new(descriptor);
    let manager = Arc::clone(manager);
    Ok(if is_property {
        Member::Property(BoundProperty { descriptor, manager })
    } else {
        Member::Method(BoundMethod { descriptor, manager })
    })
}

async fn invoke(
    descriptor: &Method,
    manager: &RequestManager,
    module: &Module,
    args: Params,
) -> Result<Value> {
    let params = {
        let ctx = MungerContext::new(module, descriptor.rpc_endpoint());
        descriptor.munge(&ctx, args)?
    };
    manager.request(descriptor.rpc_endpoint(), params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::testing::detached;
    use serde_json::json;

    #[tokio::test]
    async fn property_reads_hit_the_transport_every_time() {
        let (transport, module) = detached("m");
        let Member::Property(chain_id) = bind(Method::property("eth_chainId"), module.manager()).unwrap()
        else {
            panic!("expected a property");
        };

        assert_eq!(chain_id.get(&module).await.unwrap(), json!(61));
        assert_eq!(chain_id.get(&module).await.unwrap(), json!(61));
        assert_eq!(transport.request_count().await, 2);
    }

    #[tokio::test]
    async fn munger_failure_sends_nothing() {
        let (transport, module) = detached("m");
        let method = Method::new("eth_getBalance")
            .with_munger(|_| Err(crate::module::MungerError::new("nope")));
        let Member::Method(bound) = bind(method, module.manager()).unwrap() else {
            panic!("expected a method");
        };

        let err = bound.call(&module, vec![json!(1)]).await.unwrap_err();
        assert!(matches!(err, Error::MungerFailure { .. }));
        assert_eq!(transport.request_count().await, 0);
    }

    #[test]
    fn refuses_leading_munger_declared_late() {
        let (_, module) = detached("m");
        let method = Method::new("eth_getBlockByNumber")
            .with_munger(Ok)
            .with_leading_munger(|_, args| Ok(args));
        let err = bind(method, module.manager()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPipeline { endpoint, .. } if endpoint == "eth_getBlockByNumber"
        ));

        let late = Method::new("eth_chainId")
            .with_munger(Ok)
            .with_leading_munger(|_, args| Ok(args));
        assert!(module.attach_method("late", late).is_err());
        assert!(!module.has_member("late"));
    }

    #[test]
    fn refuses_unserved_endpoints() {
        let (_, module) = detached("m");
        let err = bind(Method::new("eth_notAThing"), module.manager()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedEndpoint { endpoint } if endpoint == "eth_notAThing"));
    }
}
