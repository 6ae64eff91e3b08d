//! Search domains
//!
//! A domain is the server's own filter grammar: a list of clauses such as
//! `["name", "ilike", "acme"]` and prefix operators such as `"|"`. It is never
//! interpreted locally, only carried to the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered list of filter clauses, passed through to the server as-is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(Vec<Value>);

impl Domain {
    /// The empty domain, matching every active record
    pub fn all() -> Self {
        Self(Vec::new())
    }

    /// Append a `[field, operator, value]` clause
    pub fn with_clause(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.0.push(Value::Array(vec![
            Value::String(field.into()),
            Value::String(operator.into()),
            value.into(),
        ]));
        self
    }

    /// Append a raw term (clause or prefix operator like `"|"`)
    pub fn with_term(mut self, term: impl Into<Value>) -> Self {
        self.0.push(term.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The domain as the JSON value sent over the wire
    pub fn to_value(&self) -> Value {
        Value::Array(self.0.clone())
    }
}

impl From<Vec<Value>> for Domain {
    fn from(terms: Vec<Value>) -> Self {
        Self(terms)
    }
}
