//! Error types for Odoolink

use odoolink_types::AccessRight;
use thiserror::Error;

/// Main error type for Odoolink operations
///
/// Every public connector operation reports its failure through this type;
/// no transport error escapes in any other form.
#[derive(Error, Debug)]
pub enum OdooError {
    /// The discovery endpoint could not be reached
    #[error("Cannot connect to server: {0}")]
    Connection(String),

    /// The server reports zero databases
    #[error("No database exists on the server")]
    NoDatabase,

    /// Credentials rejected for the resolved (or last candidate) database
    #[error("Cannot authenticate on database '{database}' with credentials provided: {reason}")]
    Auth { database: String, reason: String },

    /// Access-right check failed or raised
    #[error("Access error on '{collection}': {denial}")]
    Access {
        collection: String,
        denial: AccessDenial,
    },

    /// Missing or empty required argument
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed field-descriptor input
    #[error("Format error: {0}")]
    Format(String),

    /// Fault raised by a remote procedure
    #[error("Remote fault {code}: {message}")]
    Fault { code: i64, message: String },

    /// HTTP-level failure talking to an endpoint
    #[error("Transport error: {0}")]
    Transport(String),

    /// Payload that does not follow the wire format or the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Declared operation without an implementation
    #[error("Operation not supported: {0}")]
    Unsupported(String),
}

/// Why an access-right check did not pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessDenial {
    /// The check answered `false`
    #[error("collection does not exist or right '{0}' is not granted")]
    NotGranted(AccessRight),

    /// The check itself raised, which the server does for invalid credentials
    #[error("credentials rejected while checking right '{right}': {reason}")]
    Rejected { right: AccessRight, reason: String },
}

impl AccessDenial {
    /// The right whose check failed
    pub fn right(&self) -> AccessRight {
        match self {
            AccessDenial::NotGranted(right) => *right,
            AccessDenial::Rejected { right, .. } => *right,
        }
    }
}

impl OdooError {
    /// Returns true if the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            OdooError::Validation(_)
                | OdooError::Format(_)
                | OdooError::Unsupported(_)
        )
    }

    /// Returns true if the error was produced by the server or the wire
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            OdooError::Connection(_)
                | OdooError::Fault { .. }
                | OdooError::Transport(_)
                | OdooError::Protocol(_)
        )
    }

    /// Sanitize the error message to avoid leaking sensitive information
    pub fn sanitized_message(&self) -> String {
        match self {
            // Don't expose server locations or transport details
            OdooError::Connection(_) => "Cannot connect to server".to_string(),
            OdooError::Transport(_) | OdooError::Protocol(_) => {
                "Server communication error".to_string()
            }

            // Don't echo what the server said about the credentials
            OdooError::Auth { .. } => {
                "Cannot authenticate with credentials provided".to_string()
            }
            OdooError::Access { collection, denial } => match denial {
                AccessDenial::NotGranted(_) => self.to_string(),
                AccessDenial::Rejected { right, .. } => format!(
                    "Access error on '{}': credentials rejected while checking right '{}'",
                    collection, right
                ),
            },

            // Remote tracebacks can be long and carry server internals
            OdooError::Fault { code, .. } => format!("Remote fault {}", code),

            // Safe to expose
            _ => self.to_string(),
        }
    }
}

/// Result type alias using OdooError
pub type Result<T> = std::result::Result<T, OdooError>;
