//! Access right definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation rights checked against a collection before invoking it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessRight {
    /// Read records
    Read,
    /// Modify existing records
    Write,
    /// Create new records
    Create,
    /// Delete records
    Unlink,
}

impl fmt::Display for AccessRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessRight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "read" => Ok(AccessRight::Read),
            "write" => Ok(AccessRight::Write),
            "create" => Ok(AccessRight::Create),
            "unlink" | "delete" => Ok(AccessRight::Unlink),
            _ => Err(format!("Unknown access right: {}", s)),
        }
    }
}

impl AccessRight {
    /// Name of the right as the server's `check_access_rights` expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessRight::Read => "read",
            AccessRight::Write => "write",
            AccessRight::Create => "create",
            AccessRight::Unlink => "unlink",
        }
    }
}
