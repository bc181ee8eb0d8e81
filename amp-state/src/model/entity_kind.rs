//! Entity kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of entity held in a [`State`](super::State)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Power,
    Source,
    Zone,
    Group,
}

impl EntityKind {
    /// Name of the collection in the serialized state (`sources`, `zones`, ...)
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Power => "power",
            EntityKind::Source => "sources",
            EntityKind::Zone => "zones",
            EntityKind::Group => "groups",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Power => "power",
            EntityKind::Source => "source",
            EntityKind::Zone => "zone",
            EntityKind::Group => "group",
        };
        f.write_str(name)
    }
}
