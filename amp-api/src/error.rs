//! Error types for the command engine

use std::fmt;

use amp_hardware::HardwareError;
use amp_state::{EntityKind, GroupId, SourceId, StateError, ZoneId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Why a command was refused or failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The command addressed a source, zone or group that does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u64 },

    /// Malformed or out-of-range parameter
    #[error("invalid command: {0}")]
    Validation(#[from] ValidationError),

    /// The envelope named a command this engine does not know
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// The hardware refused or failed to carry out the change
    #[error("hardware error: {0}")]
    Hardware(#[from] HardwareError),
}

impl ApiError {
    pub fn source_not_found(id: SourceId) -> Self {
        Self::NotFound {
            kind: EntityKind::Source,
            id: id.get() as u64,
        }
    }

    pub fn zone_not_found(id: ZoneId) -> Self {
        Self::NotFound {
            kind: EntityKind::Zone,
            id: id.get() as u64,
        }
    }

    pub fn group_not_found(id: GroupId) -> Self {
        Self::NotFound {
            kind: EntityKind::Group,
            id: u64::from(id.get()),
        }
    }

    /// Machine-readable category, as carried in error replies
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::UnknownCommand(_) => ErrorKind::UnknownCommand,
            ApiError::Hardware(_) => ErrorKind::Hardware,
        }
    }
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        ApiError::Validation(err.into())
    }
}

/// Error categories visible on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Validation,
    UnknownCommand,
    Hardware,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Validation => "validation",
            ErrorKind::UnknownCommand => "unknown_command",
            ErrorKind::Hardware => "hardware",
        };
        f.write_str(name)
    }
}

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' value '{value}' is out of range ({min}..={max})")]
    RangeError {
        parameter: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Required parameter '{parameter}' is missing")]
    MissingParameter { parameter: String },

    #[error("Parameter '{parameter}' failed validation: {message}")]
    Custom { parameter: String, message: String },
}

impl ValidationError {
    pub fn range_error(
        parameter: &str,
        min: impl fmt::Display,
        max: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        Self::RangeError {
            parameter: parameter.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid_value(
        parameter: &str,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(parameter: &str) -> Self {
        Self::MissingParameter {
            parameter: parameter.to_string(),
        }
    }

    pub fn custom(parameter: &str, message: impl Into<String>) -> Self {
        Self::Custom {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }

    /// Translate a payload decoding failure
    ///
    /// serde reports absent fields as "missing field `x`"; those become
    /// `MissingParameter`, everything else a `Custom` error on the payload.
    pub fn from_serde(err: &serde_json::Error) -> Self {
        let message = err.to_string();
        message
            .strip_prefix("missing field `")
            .and_then(|rest| rest.split('`').next())
            .map(Self::missing)
            .unwrap_or_else(|| Self::custom("payload", message))
    }
}

impl From<StateError> for ValidationError {
    fn from(err: StateError) -> Self {
        Self::custom("state", err.to_string())
    }
}
