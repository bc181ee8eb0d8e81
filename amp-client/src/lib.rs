//! Blocking HTTP client for the amplifier control API
//!
//! [`AmpClient`] talks to an `ampctl-server` instance and exposes the same
//! [`CommandSurface`] as the engine, so code written against direct calls
//! runs unchanged over HTTP.
//!
//! ```no_run
//! use amp_client::AmpClient;
//! use serde_json::json;
//!
//! let client = AmpClient::new("http://127.0.0.1:5000");
//! let reply = client
//!     .send_cmd(&json!({"command": "set_zone", "id": 2, "vol": -30}))
//!     .unwrap();
//! assert!(reply.is_ok());
//! ```

mod error;

pub use error::ClientError;

use std::time::Duration;

use amp_api::{Command, CommandReply, CommandSurface};
use amp_state::State;
use serde_json::Value;
use tracing::debug;

/// HTTP client bound to one API base URL
#[derive(Debug, Clone)]
pub struct AmpClient {
    agent: ureq::Agent,
    api_url: String,
}

impl AmpClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:5000`)
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(Duration::from_secs(10))
                .build(),
            api_url: format!("{}/api", base_url.as_ref().trim_end_matches('/')),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Fetch the full state
    pub fn get_state(&self) -> Result<State, ClientError> {
        let response = self
            .agent
            .get(&self.api_url)
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, response) => ClientError::Status {
                    code,
                    body: response.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(transport) => ClientError::Network(transport.to_string()),
            })?;

        response
            .into_json::<State>()
            .map_err(|err| ClientError::Decode(err.to_string()))
    }

    /// Post a raw command envelope
    ///
    /// Commands the engine rejects come back as `Ok(CommandReply::Error { .. })`;
    /// `Err` is reserved for failing to get a reply at all.
    pub fn send_cmd(&self, envelope: &Value) -> Result<CommandReply, ClientError> {
        debug!(url = %self.api_url, "posting command");

        match self.agent.post(&self.api_url).send_json(envelope) {
            Ok(response) => response
                .into_json::<CommandReply>()
                .map_err(|err| ClientError::Decode(err.to_string())),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                Self::error_reply(code, body)
            }
            Err(ureq::Error::Transport(transport)) => {
                Err(ClientError::Network(transport.to_string()))
            }
        }
    }

    /// Post a typed command
    pub fn send(&self, command: &Command) -> Result<CommandReply, ClientError> {
        self.send_cmd(&command.to_envelope())
    }

    /// Decode the body of a non-2xx response
    ///
    /// Only a command error counts; anything else (including `null`) is a
    /// transport-level failure.
    fn error_reply(code: u16, body: String) -> Result<CommandReply, ClientError> {
        match serde_json::from_str::<CommandReply>(&body) {
            Ok(reply @ CommandReply::Error { .. }) => Ok(reply),
            _ => Err(ClientError::Status { code, body }),
        }
    }
}

impl CommandSurface for AmpClient {
    type Error = ClientError;

    fn state(&self) -> Result<State, ClientError> {
        self.get_state()
    }

    fn submit(&self, envelope: &Value) -> Result<CommandReply, ClientError> {
        self.send_cmd(envelope)
    }
}
