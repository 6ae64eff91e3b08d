//! Core domain logic for Odoolink
//!
//! This crate contains the connection configuration, session and naming rules,
//! field-descriptor synthesis and the error type shared by the Odoolink crates.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{AccessDenial, OdooError, Result};
