//! Error types for the API client

use thiserror::Error;

/// Failures reaching the API, as opposed to commands the engine rejected
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, timeout or other transport failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The server answered with a body that is not what the API sends
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Non-success status without a command error in the body
    #[error("HTTP {code}: {body}")]
    Status { code: u16, body: String },
}
