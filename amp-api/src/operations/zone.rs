//! Zone command

use amp_state::{SourceId, ZoneId};
use serde::{Deserialize, Serialize};

use super::{check_name, Validate};
use crate::error::ValidationError;

/// Partial update of one output; absent fields stay as they are
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetZone {
    pub id: ZoneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<SourceId>,
    #[serde(default, alias = "mute", skip_serializing_if = "Option::is_none")]
    pub muted: Option<bool>,
    #[serde(default, alias = "stby", skip_serializing_if = "Option::is_none")]
    pub standby: Option<bool>,
    #[serde(default, alias = "vol", skip_serializing_if = "Option::is_none")]
    pub volume: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
}

impl SetZone {
    pub fn new(id: ZoneId) -> Self {
        Self {
            id,
            name: None,
            source_id: None,
            muted: None,
            standby: None,
            volume: None,
            disabled: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn source(mut self, source_id: SourceId) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = Some(muted);
        self
    }

    pub fn standby(mut self, standby: bool) -> Self {
        self.standby = Some(standby);
        self
    }

    pub fn volume(mut self, volume: i32) -> Self {
        self.volume = Some(volume);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub(crate) fn patch(&self) -> ZonePatch<'_> {
        ZonePatch {
            name: self.name.as_deref(),
            source_id: self.source_id,
            muted: self.muted,
            standby: self.standby,
            volume: self.volume,
            disabled: self.disabled,
        }
    }
}

impl Validate for SetZone {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        check_name("name", self.name.as_deref())
    }
}

/// Zone fields to change, shared by zone and group commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ZonePatch<'a> {
    pub name: Option<&'a str>,
    pub source_id: Option<SourceId>,
    pub muted: Option<bool>,
    pub standby: Option<bool>,
    pub volume: Option<i32>,
    pub disabled: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let cmd = SetZone::new(ZoneId(2)).name("whole house").volume(-9);
        assert_eq!(cmd.id, ZoneId(2));
        assert_eq!(cmd.name.as_deref(), Some("whole house"));
        assert_eq!(cmd.volume, Some(-9));
        assert!(cmd.source_id.is_none());
    }

    #[test]
    fn test_legacy_aliases() {
        let cmd: SetZone = serde_json::from_str(
            r#"{"id": 2, "name": "whole house", "source_id": 2, "mute": false,
                "stby": false, "vol": -9, "disabled": false}"#,
        )
        .unwrap();
        let expected = SetZone::new(ZoneId(2))
            .name("whole house")
            .source(SourceId(2))
            .muted(false)
            .standby(false)
            .volume(-9)
            .disabled(false);
        assert_eq!(cmd, expected);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(SetZone::new(ZoneId(0)).name("").validate_boundary().is_err());
        assert!(SetZone::new(ZoneId(0)).volume(-500).validate_boundary().is_ok());
    }
}
