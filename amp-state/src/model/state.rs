//! Root state aggregate

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EntityKind, Group, GroupId, Power, Source, SourceId, Zone, ZoneId};
use crate::error::{Result, StateError};

/// Inclusive bounds for zone volume, in dB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min: i32,
    pub max: i32,
}

impl VolumeRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, volume: i32) -> bool {
        (self.min..=self.max).contains(&volume)
    }
}

impl Default for VolumeRange {
    fn default() -> Self {
        Self { min: -80, max: 0 }
    }
}

impl fmt::Display for VolumeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Complete logical state of one amplifier
///
/// Sources and zones have a fixed count for the lifetime of the process and
/// their ids equal their position. Groups come and go.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub power: Power,
    pub sources: Vec<Source>,
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl State {
    /// Factory-default state: everything off, analog inputs, no groups
    pub fn with_counts(source_count: usize, zone_count: usize) -> Self {
        let sources = (0..source_count)
            .map(|i| Source::new(SourceId(i), format!("Input {}", i + 1)))
            .collect();
        let zones = (0..zone_count)
            .map(|i| Zone::new(ZoneId(i), format!("Zone {}", i + 1)))
            .collect();

        Self {
            power: Power::default(),
            sources,
            zones,
            groups: Vec::new(),
        }
    }

    /// Parse a state from its JSON form and check its invariants
    pub fn from_json(json: &str, volume_range: VolumeRange) -> Result<Self> {
        let state: State =
            serde_json::from_str(json).map_err(|e| StateError::Parse(e.to_string()))?;
        state.validate(volume_range)?;
        Ok(state)
    }

    pub fn source(&self, id: SourceId) -> Option<&Source> {
        self.sources.get(id.0)
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.0)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Highest group id currently present
    pub fn max_group_id(&self) -> Option<GroupId> {
        self.groups.iter().map(|g| g.id).max()
    }

    /// Check the cross-entity invariants of a state built outside the engine
    pub fn validate(&self, volume_range: VolumeRange) -> Result<()> {
        for (position, source) in self.sources.iter().enumerate() {
            if source.id.0 != position {
                return Err(StateError::NonDenseId {
                    kind: EntityKind::Source,
                    position,
                    found: source.id.0,
                });
            }
        }

        for (position, zone) in self.zones.iter().enumerate() {
            if zone.id.0 != position {
                return Err(StateError::NonDenseId {
                    kind: EntityKind::Zone,
                    position,
                    found: zone.id.0,
                });
            }
            if self.source(zone.source_id).is_none() {
                return Err(StateError::DanglingSource {
                    zone: zone.id,
                    source_id: zone.source_id,
                });
            }
            if !volume_range.contains(zone.volume) {
                return Err(StateError::VolumeOutOfRange {
                    zone: zone.id,
                    volume: zone.volume,
                    range: volume_range,
                });
            }
        }

        let mut group_ids = HashSet::new();
        for group in &self.groups {
            if !group_ids.insert(group.id) {
                return Err(StateError::DuplicateGroupId(group.id));
            }
            if group.zones.is_empty() {
                return Err(StateError::EmptyGroup(group.id));
            }
            let mut members = HashSet::new();
            for &zone in &group.zones {
                if self.zone(zone).is_none() {
                    return Err(StateError::DanglingZone {
                        group: group.id,
                        zone,
                    });
                }
                if !members.insert(zone) {
                    return Err(StateError::DuplicateMember {
                        group: group.id,
                        zone,
                    });
                }
            }
        }

        Ok(())
    }
}
