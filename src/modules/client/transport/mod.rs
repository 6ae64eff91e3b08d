//! Transports carrying remote procedure calls to the server
//!
//! The connector only sees the [`Transport`] trait; [`XmlRpcTransport`] speaks
//! XML-RPC over HTTP, which every server exposes under `/xmlrpc/`.

pub mod codec;
mod traits;
mod xmlrpc;

#[cfg(test)]
pub(crate) mod fake;

pub use traits::Transport;
pub use xmlrpc::XmlRpcTransport;
