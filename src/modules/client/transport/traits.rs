//! Transport trait definition

use async_trait::async_trait;
use odoolink_core::OdooError;
use odoolink_types::Endpoint;
use serde_json::Value;

/// Trait for RPC transports
///
/// A transport invokes one remote procedure on one endpoint and returns its
/// payload. Faults raised by the procedure come back as
/// [`OdooError::Fault`]; failures to reach the endpoint as
/// [`OdooError::Transport`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Call a remote procedure
    ///
    /// # Arguments
    /// * `endpoint` - The service exposing the procedure
    /// * `method` - The procedure name (`version`, `authenticate`, `execute_kw`, ...)
    /// * `params` - Positional parameters
    async fn call(
        &self,
        endpoint: Endpoint,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, OdooError>;

    /// Get the transport type name
    fn transport_type(&self) -> &'static str;
}
