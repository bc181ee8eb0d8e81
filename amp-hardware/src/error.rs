//! Error types for hardware access

use thiserror::Error;

/// Errors a hardware backend can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HardwareError {
    /// The device refused a write
    #[error("hardware rejected {target}: {reason}")]
    Rejected { target: String, reason: String },

    /// Bus or transport failure while talking to the device
    #[error("hardware I/O error: {0}")]
    Io(String),

    /// The device is not reachable at all
    #[error("hardware unavailable")]
    Unavailable,
}

impl HardwareError {
    pub fn rejected(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for HardwareError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
