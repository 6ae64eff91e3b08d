//! Access-right checks and authorized object invocation

use odoolink_core::{AccessDenial, OdooError, Session};
use odoolink_types::{AccessRight, Endpoint, Record};
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::OdooConnector;
use crate::transport::Transport;

/// Handle for invoking procedures on collections once access has been checked
pub struct ObjectProxy {
    transport: Arc<dyn Transport>,
    session: Session,
    password: String,
}

impl ObjectProxy {
    pub(crate) fn new(transport: Arc<dyn Transport>, session: Session, password: &str) -> Self {
        Self {
            transport,
            session,
            password: password.to_string(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Invoke `method` on `collection` through `execute_kw`
    pub async fn execute_kw(
        &self,
        collection: &str,
        method: &str,
        args: Vec<Value>,
        kwargs: Option<Record>,
    ) -> Result<Value, OdooError> {
        debug!(
            database = %self.session.database,
            collection = %collection,
            method = %method,
            "Invoking object method"
        );

        let mut params = vec![
            json!(self.session.database),
            json!(self.session.uid),
            json!(self.password),
            json!(collection),
            json!(method),
            Value::Array(args),
        ];
        if let Some(kwargs) = kwargs {
            params.push(Value::Object(kwargs));
        }

        self.transport.call(Endpoint::Object, "execute_kw", params).await
    }
}

impl fmt::Debug for ObjectProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectProxy")
            .field("session", &self.session)
            .field("transport", &self.transport.transport_type())
            .finish()
    }
}

impl OdooConnector {
    /// Authenticate, then verify each right on `collection` in order.
    ///
    /// Stops at the first right that is not granted.
    pub async fn check_access(
        &self,
        collection: &str,
        rights: &[AccessRight],
    ) -> Result<ObjectProxy, OdooError> {
        let session = self.authenticate().await?;
        let password = self.config.password.as_deref().unwrap_or_default();
        let proxy = ObjectProxy::new(self.transport.clone(), session, password);

        let mut kwargs = Record::new();
        kwargs.insert("raise_exception".into(), Value::Bool(false));

        for right in rights {
            let granted = proxy
                .execute_kw(
                    collection,
                    "check_access_rights",
                    vec![json!(right.as_str())],
                    Some(kwargs.clone()),
                )
                .await
                .map_err(|e| OdooError::Access {
                    collection: collection.to_string(),
                    denial: AccessDenial::Rejected {
                        right: *right,
                        reason: e.to_string(),
                    },
                })?;

            if !super::is_truthy(&granted) {
                return Err(OdooError::Access {
                    collection: collection.to_string(),
                    denial: AccessDenial::NotGranted(*right),
                });
            }
        }

        Ok(proxy)
    }
}
