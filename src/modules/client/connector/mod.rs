//! Connector for one Odoo server
//!
//! Every operation runs the same pipeline: validate its inputs, authenticate,
//! check the access rights it needs on the target collection, then invoke the
//! remote procedure through an [`ObjectProxy`].

mod access;
mod models;
mod records;
mod session;

pub use access::ObjectProxy;

use odoolink_core::{ConnectionConfig, OdooError, Session};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::transport::{Transport, XmlRpcTransport};

/// Access rights required by each family of operations
pub mod rights {
    use odoolink_types::AccessRight;

    pub const READ: &[AccessRight] = &[AccessRight::Read];
    pub const CREATE: &[AccessRight] = &[AccessRight::Read, AccessRight::Create];
    pub const WRITE: &[AccessRight] = &[AccessRight::Read, AccessRight::Write];
    pub const UNLINK: &[AccessRight] = &[AccessRight::Read, AccessRight::Unlink];

    /// Rights on `ir.model` needed to create a collection and undo it
    pub const MODEL_ADMIN: &[AccessRight] =
        &[AccessRight::Read, AccessRight::Create, AccessRight::Unlink];
}

/// Client for the external RPC API of one server
pub struct OdooConnector {
    config: ConnectionConfig,
    transport: Arc<dyn Transport>,
    last_session: RwLock<Option<Session>>,
}

impl OdooConnector {
    /// Create a connector speaking XML-RPC to the configured location
    pub fn new(config: ConnectionConfig) -> Result<Self, OdooError> {
        let transport = XmlRpcTransport::from_config(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a connector over another transport
    pub fn with_transport(config: ConnectionConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            last_session: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Session established by the most recent authentication, if it succeeded
    pub async fn last_session(&self) -> Option<Session> {
        self.last_session.read().await.clone()
    }
}

impl fmt::Debug for OdooConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OdooConnector")
            .field("config", &self.config)
            .field("transport", &self.transport.transport_type())
            .finish()
    }
}

/// Every operation names its target collection
fn require_collection(collection: &str) -> Result<(), OdooError> {
    if collection.trim().is_empty() {
        return Err(OdooError::Validation("model name required".to_string()));
    }
    Ok(())
}

/// Falsy values in the server's sense: `false`, `null`, zero, empty strings
/// and empty containers
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
