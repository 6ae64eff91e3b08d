//! RPC endpoint definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service endpoints exposed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    /// Version discovery and authentication
    Common,
    /// Database enumeration
    Db,
    /// Object invocation (`execute_kw`)
    Object,
}

impl Endpoint {
    /// Path of the endpoint relative to the server location
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Common => "xmlrpc/2/common",
            Endpoint::Db => "xmlrpc/db",
            Endpoint::Object => "xmlrpc/2/object",
        }
    }

    /// Full URL of the endpoint under the given server location
    pub fn url(&self, location: &str) -> String {
        format!("{}/{}", location.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Common => write!(f, "common"),
            Endpoint::Db => write!(f, "db"),
            Endpoint::Object => write!(f, "object"),
        }
    }
}
