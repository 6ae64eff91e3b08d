//! Scripted in-memory server used by the connector tests

use async_trait::async_trait;
use odoolink_core::{ConnectionConfig, OdooError};
use odoolink_types::Endpoint;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use super::traits::Transport;
use crate::connector::OdooConnector;

pub(crate) const UID: i64 = 2;
pub(crate) const PASSWORD: &str = "admin";

static NULL: Value = Value::Null;

/// One call received by the fake
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub endpoint: Endpoint,
    pub method: String,
    pub params: Vec<Value>,
}

impl RecordedCall {
    /// Database argument of `authenticate` and `execute_kw`
    pub fn database(&self) -> Option<&str> {
        self.params.first().and_then(Value::as_str)
    }

    pub fn collection(&self) -> Option<&str> {
        self.params.get(3).and_then(Value::as_str)
    }

    /// Procedure invoked through `execute_kw`
    pub fn object_method(&self) -> Option<&str> {
        self.params.get(4).and_then(Value::as_str)
    }

    pub fn args(&self) -> &Value {
        self.params.get(5).unwrap_or(&NULL)
    }

    pub fn kwargs(&self) -> Option<&Value> {
        self.params.get(6)
    }
}

pub(crate) struct FakeOdoo {
    reachable: bool,
    databases: Vec<String>,
    accepting: HashSet<String>,
    db_list_fault: bool,
    denied: HashSet<(String, String)>,
    reject_access_checks: bool,
    faults: HashMap<(String, String), String>,
    responses: HashMap<(String, String), Value>,
    next_id: AtomicI64,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeOdoo {
    /// A reachable server with one database `demo` accepting admin/admin
    pub fn new() -> Self {
        Self {
            reachable: true,
            databases: vec!["demo".to_string()],
            accepting: ["demo".to_string()].into_iter().collect(),
            db_list_fault: false,
            denied: HashSet::new(),
            reject_access_checks: false,
            faults: HashMap::new(),
            responses: HashMap::new(),
            next_id: AtomicI64::new(100),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    /// Replace the database list; none of them accepts credentials yet
    pub fn with_databases(mut self, databases: &[&str]) -> Self {
        self.databases = databases.iter().map(|db| db.to_string()).collect();
        self.accepting.clear();
        self
    }

    pub fn accepting(mut self, database: &str) -> Self {
        self.accepting.insert(database.to_string());
        self
    }

    pub fn with_db_list_fault(mut self) -> Self {
        self.db_list_fault = true;
        self
    }

    /// Make `check_access_rights` answer `false` for this right
    pub fn denying(mut self, collection: &str, right: &str) -> Self {
        self.denied.insert((collection.to_string(), right.to_string()));
        self
    }

    /// Make every `check_access_rights` call raise
    pub fn rejecting_access_checks(mut self) -> Self {
        self.reject_access_checks = true;
        self
    }

    pub fn with_fault(mut self, collection: &str, method: &str, message: &str) -> Self {
        self.faults
            .insert((collection.to_string(), method.to_string()), message.to_string());
        self
    }

    pub fn with_response(mut self, collection: &str, method: &str, value: Value) -> Self {
        self.responses
            .insert((collection.to_string(), method.to_string()), value);
        self
    }

    pub fn into_connector(self) -> (OdooConnector, Arc<FakeOdoo>) {
        self.into_connector_with(test_config())
    }

    pub fn into_connector_with(self, config: ConnectionConfig) -> (OdooConnector, Arc<FakeOdoo>) {
        let fake = Arc::new(self);
        let connector = OdooConnector::with_transport(config, fake.clone());
        (connector, fake)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// `execute_kw` calls invoking `method`
    pub fn object_calls(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.object_method() == Some(method))
            .collect()
    }

    /// Calls other than `execute_kw` with the given method name
    pub fn service_calls(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.endpoint != Endpoint::Object && call.method == method)
            .collect()
    }

    fn fault(message: impl Into<String>) -> OdooError {
        OdooError::Fault {
            code: 1,
            message: message.into(),
        }
    }

    fn authenticate(&self, params: &[Value]) -> Result<Value, OdooError> {
        let database = params.first().and_then(Value::as_str).unwrap_or_default();
        if !self.databases.iter().any(|db| db == database) {
            return Err(Self::fault(format!("database \"{}\" does not exist", database)));
        }
        let password = params.get(2).and_then(Value::as_str);
        if self.accepting.contains(database) && password == Some(PASSWORD) {
            Ok(json!(UID))
        } else {
            Ok(json!(false))
        }
    }

    fn execute_kw(&self, params: &[Value]) -> Result<Value, OdooError> {
        let database = params.first().and_then(Value::as_str).unwrap_or_default();
        if params.get(1) != Some(&json!(UID)) || !self.accepting.contains(database) {
            return Err(Self::fault("Access Denied"));
        }
        let collection = params.get(3).and_then(Value::as_str).unwrap_or_default();
        let method = params.get(4).and_then(Value::as_str).unwrap_or_default();
        let key = (collection.to_string(), method.to_string());

        if let Some(message) = self.faults.get(&key) {
            return Err(Self::fault(message.clone()));
        }

        if method == "check_access_rights" {
            if self.reject_access_checks {
                return Err(Self::fault("Access Denied"));
            }
            let right = params
                .get(5)
                .and_then(|args| args.get(0))
                .and_then(Value::as_str)
                .unwrap_or_default();
            let denied = self
                .denied
                .contains(&(collection.to_string(), right.to_string()));
            return Ok(json!(!denied));
        }

        if let Some(value) = self.responses.get(&key) {
            return Ok(value.clone());
        }

        Ok(match method {
            "search" => json!([1, 2, 3]),
            "search_read" => json!([{"id": 1, "name": "Azure Interior"}]),
            "search_count" => json!(3),
            "fields_get" => json!({"name": {"string": "Name", "type": "char"}}),
            "create" => json!(self.next_id.fetch_add(1, Ordering::SeqCst)),
            "write" | "unlink" => json!(true),
            other => return Err(Self::fault(format!("unknown method '{}'", other))),
        })
    }
}

#[async_trait]
impl Transport for FakeOdoo {
    async fn call(
        &self,
        endpoint: Endpoint,
        method: &str,
        params: Vec<Value>,
    ) -> Result<Value, OdooError> {
        self.calls.lock().unwrap().push(RecordedCall {
            endpoint,
            method: method.to_string(),
            params: params.clone(),
        });

        if !self.reachable {
            return Err(OdooError::Transport("connection refused".to_string()));
        }

        match (endpoint, method) {
            (Endpoint::Common, "version") => Ok(json!({"server_version": "14.0"})),
            (Endpoint::Common, "authenticate") => self.authenticate(&params),
            (Endpoint::Db, "list") if self.db_list_fault => {
                Err(Self::fault("database listing is disabled"))
            }
            (Endpoint::Db, "list") => Ok(json!(self.databases)),
            (Endpoint::Object, "execute_kw") => self.execute_kw(&params),
            (endpoint, method) => Err(Self::fault(format!(
                "no method '{}' on endpoint {}",
                method, endpoint
            ))),
        }
    }

    fn transport_type(&self) -> &'static str {
        "fake"
    }
}

/// admin/admin on database `demo`
pub(crate) fn test_config() -> ConnectionConfig {
    ConnectionConfig::new()
        .with_database("demo")
        .with_credentials("admin", PASSWORD)
}
