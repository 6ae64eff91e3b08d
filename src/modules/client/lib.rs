//! Client for the external RPC API of Odoo servers
//!
//! This crate provides the transport seam and its XML-RPC implementation, the
//! [`OdooConnector`] call pipeline (authenticate, check access rights, invoke)
//! and the record and model operations built on it.

pub mod compensation;
pub mod connector;
pub mod transport;

pub use compensation::Compensation;
pub use connector::{rights, ObjectProxy, OdooConnector};
pub use transport::{Transport, XmlRpcTransport};

pub use odoolink_core::{ConnectionConfig, DatabaseDiscovery, OdooError, Session};
pub use odoolink_types::{AccessRight, Domain, Endpoint, Page, Record};
