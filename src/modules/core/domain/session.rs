//! Authenticated session

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of a successful authentication: the database that accepted the
/// credentials and the user id the server issued for them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub database: String,
    pub uid: i64,
}

impl Session {
    pub fn new(database: impl Into<String>, uid: i64) -> Self {
        Self {
            database: database.into(),
            uid,
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uid {} on '{}'", self.uid, self.database)
    }
}
