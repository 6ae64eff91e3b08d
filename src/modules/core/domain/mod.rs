//! Domain models for Odoolink

mod config;
mod field;
mod naming;
mod session;

pub use config::{ConnectionConfig, DatabaseDiscovery, DEFAULT_HOST};
pub use field::{build_field_descriptors, field_descriptor, model_record, MANUAL_STATE};
pub use naming::{default_record_name, ensure_custom_prefix, has_custom_prefix, technical_name};
pub use session::Session;
