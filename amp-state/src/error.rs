//! Error types for amp-state

use thiserror::Error;

use crate::model::{EntityKind, GroupId, SourceId, VolumeRange, ZoneId};

/// Result type for amp-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// A state that breaks one of the model invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("{kind} at position {position} has id {found}; ids must equal their position")]
    NonDenseId {
        kind: EntityKind,
        position: usize,
        found: usize,
    },

    #[error("zone {zone} references missing source {source_id}")]
    DanglingSource { zone: ZoneId, source_id: SourceId },

    #[error("group {group} references missing zone {zone}")]
    DanglingZone { group: GroupId, zone: ZoneId },

    #[error("group {group} lists zone {zone} more than once")]
    DuplicateMember { group: GroupId, zone: ZoneId },

    #[error("group {0} has no zones")]
    EmptyGroup(GroupId),

    #[error("group id {0} is used more than once")]
    DuplicateGroupId(GroupId),

    #[error("zone {zone} volume {volume} is outside {range}")]
    VolumeOutOfRange {
        zone: ZoneId,
        volume: i32,
        range: VolumeRange,
    },

    #[error("failed to parse state: {0}")]
    Parse(String),
}
