//! Gridly API client.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport};

/// Sends [`ApiRequest`]s and normalizes their responses.
///
/// Cheap to clone; all clones share one transport and one credential.
#[derive(Debug, Clone)]
pub struct GridlyClient {
    transport: Arc<dyn HttpTransport>,
}

impl GridlyClient {
    /// Build a client over the production `reqwest` transport.
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send a request whose success body is JSON, returned verbatim.
    pub async fn send_json(&self, request: ApiRequest) -> ClientResult<Value> {
        self.transport.execute(request).await?.into_json()
    }

    /// Send a delete-style request.
    ///
    /// Returns `true` only for a 204 No Content response. Any other response
    /// is reported as `false`; transport failures are still errors.
    pub async fn send_delete(&self, request: ApiRequest) -> ClientResult<bool> {
        let response = self.transport.execute(request).await?;
        if !response.is_no_content() {
            debug!(status = response.status, "Delete was not acknowledged with 204");
        }
        Ok(response.is_no_content())
    }
}
