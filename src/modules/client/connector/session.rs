//! Server discovery and authentication

use odoolink_core::{DatabaseDiscovery, OdooError, Session};
use odoolink_types::Endpoint;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::OdooConnector;

impl OdooConnector {
    /// Query the version payload of the common endpoint.
    ///
    /// Any failure means the server cannot be reached.
    pub async fn server_version(&self) -> Result<Value, OdooError> {
        debug!(location = %self.config.location(), "Opening common endpoint");
        self.transport
            .call(Endpoint::Common, "version", vec![])
            .await
            .map_err(|e| OdooError::Connection(e.to_string()))
    }

    /// Names of the databases hosted by the server
    pub async fn list_databases(&self) -> Result<Vec<String>, OdooError> {
        let response = self.transport.call(Endpoint::Db, "list", vec![]).await?;

        let items = match response {
            Value::Array(items) => items,
            other => {
                return Err(OdooError::Protocol(format!(
                    "database list must be an array, got {}",
                    other
                )))
            }
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::String(name) => Ok(name),
                other => Err(OdooError::Protocol(format!(
                    "database name must be a string, got {}",
                    other
                ))),
            })
            .collect()
    }

    /// Authenticate against the configured database, or discover one.
    ///
    /// The outcome replaces [`last_session`](Self::last_session): the new
    /// session on success, nothing on failure.
    pub async fn authenticate(&self) -> Result<Session, OdooError> {
        let outcome = self.resolve_session().await;
        *self.last_session.write().await = outcome.as_ref().ok().cloned();
        outcome
    }

    async fn resolve_session(&self) -> Result<Session, OdooError> {
        self.server_version().await?;

        let (username, password) = match self.config.credentials() {
            Some(credentials) => credentials,
            None => {
                return Err(OdooError::Auth {
                    database: self.config.database().unwrap_or_default().to_string(),
                    reason: "username and password are required".to_string(),
                })
            }
        };

        if let Some(database) = self.config.database() {
            let session = self.login(database, username, password).await?;
            info!(session = %session, "Session established");
            return Ok(session);
        }

        let databases = self.list_databases().await?;
        if databases.is_empty() {
            return Err(OdooError::NoDatabase);
        }

        let candidates = match self.config.discovery {
            DatabaseDiscovery::TryAll => &databases[..],
            DatabaseDiscovery::FirstOnly => &databases[..1],
        };

        let mut last_error = OdooError::NoDatabase;
        for database in candidates {
            match self.login(database, username, password).await {
                Ok(session) => {
                    info!(session = %session, "Session established on discovered database");
                    return Ok(session);
                }
                Err(e) => {
                    warn!(database = %database, error = %e, "Authentication failed");
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }

    /// One `authenticate` call on one database
    async fn login(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<Session, OdooError> {
        debug!(database = %database, username = %username, "Authenticating");
        let rejected = |reason: String| OdooError::Auth {
            database: database.to_string(),
            reason,
        };

        let uid = self
            .transport
            .call(
                Endpoint::Common,
                "authenticate",
                vec![json!(database), json!(username), json!(password), json!({})],
            )
            .await
            .map_err(|e| rejected(e.to_string()))?;

        match uid.as_i64() {
            Some(uid) if uid > 0 => Ok(Session::new(database, uid)),
            _ => Err(rejected(format!("server answered {}", uid))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::fake::{test_config, FakeOdoo, UID};
    use odoolink_core::ConnectionConfig;
    use odoolink_types::Domain;
    use tokio_test::{assert_err, assert_ok};

    fn discovery_config() -> ConnectionConfig {
        ConnectionConfig::new().with_credentials("admin", "admin")
    }

    #[tokio::test]
    async fn test_authenticate_configured_database() {
        let (connector, fake) = FakeOdoo::new().into_connector();

        let session = assert_ok!(connector.authenticate().await);
        assert_eq!(session, Session::new("demo", UID));
        assert_eq!(connector.last_session().await, Some(session));

        assert_eq!(fake.service_calls("version").len(), 1);
        assert_eq!(fake.service_calls("list").len(), 0);
    }

    #[tokio::test]
    async fn test_discovery_tries_databases_in_order() {
        let (connector, fake) = FakeOdoo::new()
            .with_databases(&["db1", "db2"])
            .accepting("db2")
            .into_connector_with(discovery_config());

        let count = assert_ok!(connector.get_count("res.partner", &Domain::all()).await);
        assert_eq!(count, 3);
        assert_eq!(
            connector.last_session().await,
            Some(Session::new("db2", UID))
        );

        let attempts: Vec<String> = fake
            .service_calls("authenticate")
            .iter()
            .filter_map(|call| call.database().map(str::to_string))
            .collect();
        assert_eq!(attempts, vec!["db1", "db2"]);

        // Object calls target the database that accepted the credentials
        for call in fake.object_calls("search_count") {
            assert_eq!(call.database(), Some("db2"));
        }
    }

    #[tokio::test]
    async fn test_discovery_reports_last_failure() {
        let (connector, _fake) = FakeOdoo::new()
            .with_databases(&["db1", "db2"])
            .into_connector_with(discovery_config());

        let err = assert_err!(connector.authenticate().await);
        assert!(matches!(err, OdooError::Auth { database, .. } if database == "db2"));
    }

    #[tokio::test]
    async fn test_first_only_discovery() {
        let config = discovery_config().with_discovery(DatabaseDiscovery::FirstOnly);
        let (connector, fake) = FakeOdoo::new()
            .with_databases(&["db1", "db2"])
            .accepting("db2")
            .into_connector_with(config);

        let err = assert_err!(connector.authenticate().await);
        assert!(matches!(err, OdooError::Auth { database, .. } if database == "db1"));
        assert_eq!(fake.service_calls("authenticate").len(), 1);
    }

    #[tokio::test]
    async fn test_no_database() {
        let (connector, fake) = FakeOdoo::new()
            .with_databases(&[])
            .into_connector_with(discovery_config());

        let err = assert_err!(connector.authenticate().await);
        assert!(matches!(err, OdooError::NoDatabase));
        assert!(fake.service_calls("authenticate").is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let (connector, fake) = FakeOdoo::unreachable().into_connector();

        let err = assert_err!(connector.authenticate().await);
        assert!(matches!(err, OdooError::Connection(_)));
        assert_eq!(fake.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_operations() {
        let (connector, _fake) = FakeOdoo::unreachable().into_connector();

        let err = assert_err!(connector.get_ids("res.partner", &Domain::all(), Default::default()).await);
        assert!(matches!(err, OdooError::Connection(_)));
    }

    #[tokio::test]
    async fn test_wrong_configured_database() {
        let config = test_config().with_database("missing");
        let (connector, _fake) = FakeOdoo::new().into_connector_with(config);

        let err = assert_err!(connector.authenticate().await);
        assert!(matches!(err, OdooError::Auth { database, .. } if database == "missing"));
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let config = ConnectionConfig::new()
            .with_database("demo")
            .with_credentials("admin", "wrong");
        let (connector, _fake) = FakeOdoo::new().into_connector_with(config);

        let err = assert_err!(connector.authenticate().await);
        assert!(matches!(err, OdooError::Auth { .. }));
        assert_eq!(
            err.sanitized_message(),
            "Cannot authenticate with credentials provided"
        );
    }

    #[tokio::test]
    async fn test_missing_credentials_skip_authenticate_call() {
        let config = ConnectionConfig::new().with_database("demo");
        let (connector, fake) = FakeOdoo::new().into_connector_with(config);

        let err = assert_err!(connector.authenticate().await);
        assert!(matches!(err, OdooError::Auth { .. }));
        assert!(fake.service_calls("authenticate").is_empty());
    }

    #[tokio::test]
    async fn test_failed_authentication_clears_last_session() {
        let fake = std::sync::Arc::new(FakeOdoo::new());
        let connector = OdooConnector::with_transport(test_config(), fake.clone());
        assert_ok!(connector.authenticate().await);
        assert!(connector.last_session().await.is_some());

        let broken = OdooConnector::with_transport(test_config().with_database("missing"), fake);
        *broken.last_session.write().await = Some(Session::new("demo", UID));
        assert_err!(broken.authenticate().await);
        assert!(broken.last_session().await.is_none());
    }

    #[tokio::test]
    async fn test_list_databases() {
        let (connector, _fake) = FakeOdoo::new()
            .with_databases(&["a", "b"])
            .into_connector();

        let databases = assert_ok!(connector.list_databases().await);
        assert_eq!(databases, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_list_databases_fault() {
        let (connector, _fake) = FakeOdoo::new().with_db_list_fault().into_connector();

        let err = assert_err!(connector.list_databases().await);
        assert!(matches!(err, OdooError::Fault { .. }));
    }

    #[tokio::test]
    async fn test_server_version() {
        let (connector, _fake) = FakeOdoo::new().into_connector();
        let version = assert_ok!(connector.server_version().await);
        assert_eq!(version["server_version"], "14.0");
    }
}
