//! Zone type

use super::{SourceId, ZoneId};
use serde::{Deserialize, Serialize};

/// A fixed audio output path (one speaker area) bound to exactly one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Position of this output on the amplifier
    pub id: ZoneId,
    /// Friendly name shown to users
    pub name: String,
    /// Source currently routed to this zone
    pub source_id: SourceId,
    /// Whether the output is muted
    #[serde(alias = "mute")]
    pub muted: bool,
    /// Whether the output amplifier is in standby
    #[serde(alias = "stby")]
    pub standby: bool,
    /// Attenuation in dB, within the configured volume range
    #[serde(alias = "vol")]
    pub volume: i32,
    /// Disabled zones are hidden from users but still configurable
    pub disabled: bool,
}

impl Zone {
    /// Create an enabled, unmuted zone at full volume playing source 0
    pub fn new(id: ZoneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            source_id: SourceId(0),
            muted: false,
            standby: false,
            volume: 0,
            disabled: false,
        }
    }
}
