//! Group type

use super::{GroupId, ZoneId};
use serde::{Deserialize, Serialize};

/// A named collection of zones that receive updates as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique, never-reused group identifier
    pub id: GroupId,
    /// Friendly name shown to users
    pub name: String,
    /// Member zones, in the order they were given
    pub zones: Vec<ZoneId>,
}

impl Group {
    /// Create a new Group
    pub fn new(id: GroupId, name: impl Into<String>, zones: Vec<ZoneId>) -> Self {
        Self {
            id,
            name: name.into(),
            zones,
        }
    }

    /// Member zones in ascending id order, the order updates are applied in
    pub fn sorted_zones(&self) -> Vec<ZoneId> {
        let mut zones = self.zones.clone();
        zones.sort_unstable();
        zones
    }
}
