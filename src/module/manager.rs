use std::sync::Arc;

use serde_json::Value;

use super::error::{Error, Result};
use super::munger::Params;
use crate::libs::rpc::{RequestFormatter, ResponseDecoder, Transport};

/// The transport handle every module of a client shares: one transport plus
/// the optional per-endpoint formatter applied to outgoing params and decoder
/// applied to results.
#[derive(Debug, Clone)]
pub struct RequestManager {
    transport: Arc<dyn Transport>,
    formatter: Option<Arc<dyn RequestFormatter>>,
    decoder: Option<Arc<dyn ResponseDecoder>>,
}

impl RequestManager {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            formatter: None,
            decoder: None,
        }
    }

    pub fn with_formatter(mut self, formatter: Arc<dyn RequestFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn ResponseDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn supports(&self, endpoint: &str) -> bool {
        self.transport.supports(endpoint)
    }

    /// Format `params` for `endpoint`, send them and decode the result.
    /// Transport errors come back verbatim.
    pub async fn request(&self, endpoint: &str, params: Params) -> Result<Value> {
        let params = match &self.formatter {
            Some(formatter) => formatter.format(endpoint, params),
            None => params,
        };
        let raw = self.transport.request(endpoint, params).await?;
        match &self.decoder {
            Some(decoder) => decoder
                .decode(endpoint, raw)
                .map_err(|e| Error::decode(endpoint, e)),
            None => Ok(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::rpc::{EthDecoder, EthFormatter, TesterTransport, TransportError};
    use serde_json::json;

    #[tokio::test]
    async fn raw_results_without_decoder() {
        let manager = RequestManager::new(Arc::new(TesterTransport::new()));
        assert_eq!(manager.request("eth_chainId", vec![]).await.unwrap(), json!("0x3d"));

        let decoded = manager.with_decoder(Arc::new(EthDecoder));
        assert_eq!(decoded.request("eth_chainId", vec![]).await.unwrap(), json!(61));
    }

    #[tokio::test]
    async fn formatter_runs_before_the_transport() {
        let transport = Arc::new(TesterTransport::new());
        let plain = RequestManager::new(transport.clone());
        let err = plain
            .request("eth_getBlockByNumber", vec![json!(0)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Rpc { code: -32602, .. })));
        assert_eq!(transport.last_request().await.unwrap().params, vec![json!(0)]);

        let formatted = plain.with_formatter(Arc::new(EthFormatter));
        let block = formatted
            .request("eth_getBlockByNumber", vec![json!(0)])
            .await
            .unwrap();
        assert_eq!(block["number"], json!("0x0"));
        assert_eq!(transport.last_request().await.unwrap().params, vec![json!("0x0")]);
    }

    #[tokio::test]
    async fn transport_errors_pass_through() {
        let manager = RequestManager::new(Arc::new(TesterTransport::new()));
        assert!(!manager.supports("eth_nope"));
        let err = manager.request("eth_nope", vec![]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::Rpc { code: -32601, .. })
        ));
    }
}
