//! Audio source type

use super::SourceId;
use serde::{Deserialize, Serialize};

/// A fixed audio input channel (e.g. a streamer or a TV)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Position of this input on the amplifier
    pub id: SourceId,
    /// Friendly name shown to users
    pub name: String,
    /// Whether the input is fed from the digital path instead of the analog jack
    #[serde(alias = "digital")]
    pub is_digital: bool,
}

impl Source {
    /// Create an analog source with the given name
    pub fn new(id: SourceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_digital: false,
        }
    }
}
