//! Values exchanged with a hardware backend

use amp_state::{Power, SourceId, ZoneId};
use serde::{Deserialize, Serialize};

/// Input configuration pushed to the device for one source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub is_digital: bool,
}

/// Zone settings to push; `None` fields are left untouched on the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<SourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standby: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i32>,
}

impl ZoneUpdate {
    /// True when there is nothing to send
    pub fn is_empty(&self) -> bool {
        self.source_id.is_none()
            && self.muted.is_none()
            && self.standby.is_none()
            && self.volume.is_none()
    }
}

/// Telemetry for one input as read back from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSourceStatus {
    pub id: SourceId,
    pub is_digital: bool,
}

/// Telemetry for one output as read back from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawZoneStatus {
    pub id: ZoneId,
    pub source_id: SourceId,
    pub muted: bool,
    pub standby: bool,
    pub volume: i32,
}

impl RawZoneStatus {
    /// Status of a zone the device has not been told anything about
    pub fn idle(id: ZoneId) -> Self {
        Self {
            id,
            source_id: SourceId(0),
            muted: false,
            standby: false,
            volume: 0,
        }
    }

    /// Fold an update into this status
    pub fn apply(&mut self, update: &ZoneUpdate) {
        if let Some(source_id) = update.source_id {
            self.source_id = source_id;
        }
        if let Some(muted) = update.muted {
            self.muted = muted;
        }
        if let Some(standby) = update.standby {
            self.standby = standby;
        }
        if let Some(volume) = update.volume {
            self.volume = volume;
        }
    }
}

/// Everything the device reports about itself
///
/// A backend may only know part of the picture: `power` can be missing and
/// `sources`/`zones` only list the entries it could read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatus {
    pub power: Option<Power>,
    pub sources: Vec<RawSourceStatus>,
    pub zones: Vec<RawZoneStatus>,
}

/// One write issued to a backend, as recorded by [`MockHardware`](crate::MockHardware)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareCall {
    Power(Power),
    Source(SourceId, SourceConfig),
    Zone(ZoneId, ZoneUpdate),
}
