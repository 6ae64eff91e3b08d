//! Server connection configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Location used when no URL is configured
pub const DEFAULT_HOST: &str = "localhost:8069";

/// How the target database is chosen when none is configured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseDiscovery {
    /// Try every database in enumeration order, stop at the first one that
    /// accepts the credentials
    #[default]
    TryAll,
    /// Only try the first database the server reports
    FirstOnly,
}

impl fmt::Display for DatabaseDiscovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseDiscovery::TryAll => write!(f, "try_all"),
            DatabaseDiscovery::FirstOnly => write!(f, "first_only"),
        }
    }
}

impl FromStr for DatabaseDiscovery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "try_all" | "all" => Ok(DatabaseDiscovery::TryAll),
            "first_only" | "first" => Ok(DatabaseDiscovery::FirstOnly),
            _ => Err(format!("Unknown database discovery policy: {}", s)),
        }
    }
}

/// Connection parameters for one server
///
/// Immutable once handed to a connector.
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Full URL of the server (`https://erp.example.com`); wins over `host`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// `hostname:port` of the server, used when `url` is not set
    #[serde(default = "default_host")]
    pub host: String,

    /// Database name; discovered from the server when not set
    #[serde(default, alias = "db", skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(default, alias = "login", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Database discovery policy
    #[serde(default)]
    pub discovery: DatabaseDiscovery,

    /// Request timeout in seconds; the HTTP client default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: default_host(),
            database: None,
            username: None,
            password: None,
            discovery: DatabaseDiscovery::default(),
            timeout_secs: None,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("url", &self.url)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("discovery", &self.discovery)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a configuration pointing at the default host
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_discovery(mut self, discovery: DatabaseDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Server location: the URL if configured, otherwise `host`.
    ///
    /// A location without a scheme is served over plain `http://`.
    pub fn location(&self) -> String {
        let raw = self
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.host)
            .trim_end_matches('/');

        if raw.contains("://") {
            raw.to_string()
        } else {
            format!("http://{}", raw)
        }
    }

    /// Configured database name, ignoring empty strings
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref().filter(|db| !db.is_empty())
    }

    /// Username and password, when both are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) if !username.is_empty() => {
                Some((username, password))
            }
            _ => None,
        }
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
