//! Group commands

use amp_state::{GroupId, SourceId, ZoneId};
use serde::{Deserialize, Serialize};

use super::{check_members, check_name, Validate, ZonePatch};
use crate::error::ValidationError;

/// Create a group from a list of zones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGroup {
    pub name: String,
    pub zones: Vec<ZoneId>,
}

impl CreateGroup {
    pub fn new(name: impl Into<String>, zones: impl IntoIterator<Item = ZoneId>) -> Self {
        Self {
            name: name.into(),
            zones: zones.into_iter().collect(),
        }
    }
}

impl Validate for CreateGroup {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        check_name("name", Some(&self.name))?;
        check_members(&self.zones)
    }
}

/// Update a group and cascade zone settings to its members
///
/// `name` renames the group itself and `zones` replaces its membership. The
/// remaining fields are applied to every member zone as a zone update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetGroup {
    pub id: GroupId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<ZoneId>>,
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

impl SetGroup {
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            name: None,
            zones: None,
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

    pub fn zones(mut self, zones: impl IntoIterator<Item = ZoneId>) -> Self {
        self.zones = Some(zones.into_iter().collect());
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

    /// The zone update applied to each member; never renames zones
    pub(crate) fn member_patch(&self) -> ZonePatch<'static> {
        ZonePatch {
            name: None,
            source_id: self.source_id,
            muted: self.muted,
            standby: self.standby,
            volume: self.volume,
            disabled: self.disabled,
        }
    }
}

impl Validate for SetGroup {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        check_name("name", self.name.as_deref())?;
        match &self.zones {
            Some(zones) => check_members(zones),
            None => Ok(()),
        }
    }
}

/// Remove a group; member zones keep their settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteGroup {
    pub id: GroupId,
}

impl DeleteGroup {
    pub fn new(id: GroupId) -> Self {
        Self { id }
    }
}

impl Validate for DeleteGroup {}
