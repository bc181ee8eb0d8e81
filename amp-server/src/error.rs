//! Error types for the HTTP transport

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur while running the API server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: SocketAddr, reason: String },
}
