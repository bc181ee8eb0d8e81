//! Command envelope dispatch and wire results
//!
//! A command envelope is a JSON object with a `command` field naming the
//! command and the command's fields next to it:
//!
//! ```json
//! {"command": "set_zone", "id": 2, "vol": -9}
//! ```
//!
//! [`Command::from_envelope`] turns one into a typed [`Command`];
//! [`CommandReply`] is what goes back to the caller.

use amp_state::State;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ErrorKind, ValidationError};
use crate::operations::{CreateGroup, DeleteGroup, SetGroup, SetPower, SetSource, SetZone};

/// Every command the engine accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    SetPower(SetPower),
    SetSource(SetSource),
    SetZone(SetZone),
    SetGroup(SetGroup),
    CreateGroup(CreateGroup),
    DeleteGroup(DeleteGroup),
}

impl Command {
    /// Envelope name of this command
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetPower(_) => "set_power",
            Command::SetSource(_) => "set_source",
            Command::SetZone(_) => "set_zone",
            Command::SetGroup(_) => "set_group",
            Command::CreateGroup(_) => "create_group",
            Command::DeleteGroup(_) => "delete_group",
        }
    }

    /// Decode a command envelope
    ///
    /// Fields the named command does not use are ignored.
    ///
    /// # Errors
    /// - `Validation` when the envelope is not an object, `command` is
    ///   missing or not a string, or the command's fields are malformed
    /// - `UnknownCommand` when `command` names no known command
    pub fn from_envelope(envelope: &Value) -> Result<Self, ApiError> {
        let fields = envelope.as_object().ok_or_else(|| {
            ValidationError::invalid_value("envelope", envelope, "expected a JSON object")
        })?;

        let name = match fields.get("command") {
            Some(Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(ValidationError::invalid_value(
                    "command",
                    other,
                    "expected a command name",
                )
                .into())
            }
            None => return Err(ValidationError::missing("command").into()),
        };

        let command = match name {
            "set_power" => Command::SetPower(payload(envelope)?),
            "set_source" => Command::SetSource(payload(envelope)?),
            "set_zone" => Command::SetZone(payload(envelope)?),
            "set_group" => Command::SetGroup(payload(envelope)?),
            "create_group" => Command::CreateGroup(payload(envelope)?),
            "delete_group" => Command::DeleteGroup(payload(envelope)?),
            other => return Err(ApiError::UnknownCommand(other.to_string())),
        };
        Ok(command)
    }

    /// Encode as a command envelope
    pub fn to_envelope(&self) -> Value {
        // A derived Serialize over plain structs cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn payload<T: DeserializeOwned>(envelope: &Value) -> Result<T, ValidationError> {
    T::deserialize(envelope).map_err(|e| ValidationError::from_serde(&e))
}

macro_rules! impl_from_payload {
    ($($payload:ident),* $(,)?) => {
        $(
            impl From<$payload> for Command {
                fn from(payload: $payload) -> Self {
                    Command::$payload(payload)
                }
            }
        )*
    };
}

impl_from_payload!(SetPower, SetSource, SetZone, SetGroup, CreateGroup, DeleteGroup);

/// Result of one command as carried on the wire
///
/// Success is `null` (or a value for commands that return one); failure is
/// `{"error": "<message>", "kind": "<error kind>"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandReply {
    Error { error: String, kind: ErrorKind },
    Ok(Value),
}

impl CommandReply {
    pub fn ok() -> Self {
        CommandReply::Ok(Value::Null)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CommandReply::Ok(_))
    }

    /// The error kind, if this reply is a failure
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            CommandReply::Error { kind, .. } => Some(*kind),
            CommandReply::Ok(_) => None,
        }
    }
}

impl From<Result<(), ApiError>> for CommandReply {
    fn from(result: Result<(), ApiError>) -> Self {
        match result {
            Ok(()) => CommandReply::ok(),
            Err(err) => err.into(),
        }
    }
}

impl From<ApiError> for CommandReply {
    fn from(err: ApiError) -> Self {
        CommandReply::Error {
            error: err.to_string(),
            kind: err.kind(),
        }
    }
}

/// A way of reaching the command engine
///
/// Implemented by the engine itself (direct calls) and by the HTTP client, so
/// the same command sequence can be driven through either and compared.
pub trait CommandSurface {
    /// Transport failure; the direct surface has none
    type Error: std::error::Error;

    /// Current state snapshot
    fn state(&self) -> Result<State, Self::Error>;

    /// Submit one command envelope
    fn submit(&self, envelope: &Value) -> Result<CommandReply, Self::Error>;
}
