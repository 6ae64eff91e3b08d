//! XML-RPC over HTTP transport

use async_trait::async_trait;
use odoolink_core::{ConnectionConfig, OdooError};
use odoolink_types::Endpoint;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, trace};

use super::codec;
use super::traits::Transport;

/// Transport posting XML-RPC documents to `<location>/<endpoint path>`
pub struct XmlRpcTransport {
    location: String,
    client: Client,
}

impl XmlRpcTransport {
    /// Create a transport with the HTTP client's default timeouts
    pub fn new(location: impl Into<String>) -> Result<Self, OdooError> {
        Self::with_timeout(location, None)
    }

    /// Create a transport with an optional request timeout
    pub fn with_timeout(
        location: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, OdooError> {
        let mut builder =
            Client::builder().user_agent(concat!("odoolink/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| OdooError::Transport(format!("HTTP client creation failed: {}", e)))?;

        Ok(Self {
            location: location.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create a transport for the location and timeout of a configuration
    pub fn from_config(config: &ConnectionConfig) -> Result<Self, OdooError> {
        Self::with_timeout(config.location(), config.timeout())
    }

    /// Server location requests are sent to
    pub fn location(&self) -> &str {
        &self.location
    }
}

#[async_trait]
impl Transport for XmlRpcTransport {
    async fn call(
        &self,
        endpoint: Endpoint,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, OdooError> {
        let url = endpoint.url(&self.location);
        let body = codec::encode_call(method, &params)?;
        debug!(endpoint = %endpoint, method = %method, "Sending XML-RPC request");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| OdooError::Transport(format!("{} request to {} failed: {}", method, url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OdooError::Transport(format!(
                "{} request to {} returned HTTP {}",
                method, url, status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| OdooError::Transport(format!("Failed to read response from {}: {}", url, e)))?;
        trace!(endpoint = %endpoint, method = %method, bytes = text.len(), "Received XML-RPC response");

        codec::decode_response(&text)
    }

    fn transport_type(&self) -> &'static str {
        "xmlrpc"
    }
}
