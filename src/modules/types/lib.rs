//! Type definitions for Odoolink
//!
//! This crate contains the shared vocabulary used across the Odoolink codebase:
//! access rights, RPC endpoints, search domains, result paging and record maps.

pub mod access;
pub mod domain;
pub mod endpoint;
pub mod page;

pub use access::AccessRight;
pub use domain::Domain;
pub use endpoint::Endpoint;
pub use page::Page;

/// A single record as exchanged with the server: field name to value
pub type Record = serde_json::Map<String, serde_json::Value>;
