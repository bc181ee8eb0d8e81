//! Change detection between two state snapshots
//!
//! The comparison is schema-aware: every entity lists its fields in schema
//! order through [`EntityFields`], and [`diff`] walks power, sources, zones
//! and groups in that order. The output is therefore stable across runs.
//!
//! Sources and zones have fixed ids equal to their position and are compared
//! index by index. Groups are matched by id, so deleting a group in the middle
//! of the list shows up as one removal rather than a cascade of value changes.
//!
//! ```rust
//! use amp_state::{diff, State};
//! use serde_json::json;
//!
//! let before = State::with_counts(4, 6);
//! let mut after = before.clone();
//! after.power.audio_power = true;
//! after.zones[2].name = "whole house".to_string();
//!
//! let changes = diff(&before, &after);
//! assert_eq!(
//!     changes.changed_map(),
//!     vec![
//!         ("power.audio_power".to_string(), json!(true)),
//!         ("zones[2].name".to_string(), json!("whole house")),
//!     ]
//! );
//! assert!(diff(&after, &after).is_empty());
//! ```

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use serde_json::Value;

use crate::model::{EntityKind, Group, Power, Source, State, Zone};

// ============================================================================
// Paths and entries
// ============================================================================

/// Location of one leaf field, rendered as `zones[2].volume` or `power.usb_power`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub kind: EntityKind,
    /// Position in the collection; `None` for the power flags
    pub index: Option<usize>,
    pub field: &'static str,
}

impl FieldPath {
    pub fn new(kind: EntityKind, index: Option<usize>, field: &'static str) -> Self {
        Self { kind, index, field }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}].{}", self.kind.collection(), index, self.field),
            None => write!(f, "{}.{}", self.kind.collection(), self.field),
        }
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A field present in both snapshots whose value differs
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub path: FieldPath,
    pub old: Value,
    pub new: Value,
}

/// A field of an entity present in only one of the snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub path: FieldPath,
    pub value: Value,
}

// ============================================================================
// Changeset
// ============================================================================

/// Minimal field-level difference between two states
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changeset {
    /// Fields whose value changed, in schema order
    pub changed: Vec<FieldChange>,
    /// Every field of entities that only exist in the newer snapshot
    pub added: Vec<FieldEntry>,
    /// Every field of entities that only existed in the older snapshot,
    /// with the values they had before removal
    pub removed: Vec<FieldEntry>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// `(path, new value)` for every changed field
    pub fn changed_map(&self) -> Vec<(String, Value)> {
        self.changed
            .iter()
            .map(|c| (c.path.to_string(), c.new.clone()))
            .collect()
    }

    /// `(path, value)` for every added field
    pub fn added_map(&self) -> Vec<(String, Value)> {
        entries_map(&self.added)
    }

    /// `(path, last value)` for every removed field
    pub fn removed_map(&self) -> Vec<(String, Value)> {
        entries_map(&self.removed)
    }

    fn record<E: EntityFields>(entries: &mut Vec<FieldEntry>, index: Option<usize>, entity: &E) {
        entries.extend(entity.fields().into_iter().map(|(field, value)| FieldEntry {
            path: FieldPath::new(E::KIND, index, field),
            value,
        }));
    }

    fn compare<E: EntityFields>(&mut self, index: Option<usize>, old: &E, new: &E) {
        for ((field, old_value), (_, new_value)) in old.fields().into_iter().zip(new.fields()) {
            if old_value != new_value {
                self.changed.push(FieldChange {
                    path: FieldPath::new(E::KIND, index, field),
                    old: old_value,
                    new: new_value,
                });
            }
        }
    }
}

fn entries_map(entries: &[FieldEntry]) -> Vec<(String, Value)> {
    entries
        .iter()
        .map(|e| (e.path.to_string(), e.value.clone()))
        .collect()
}

/// Serializes as `{"changed": {path: new}, "added": {path: value}, "removed": {path: value}}`
/// keeping schema order inside each map.
impl Serialize for Changeset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Changed<'a>(&'a [FieldChange]);
        struct Entries<'a>(&'a [FieldEntry]);

        impl Serialize for Changed<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for change in self.0 {
                    map.serialize_entry(&change.path, &change.new)?;
                }
                map.end()
            }
        }

        impl Serialize for Entries<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for entry in self.0 {
                    map.serialize_entry(&entry.path, &entry.value)?;
                }
                map.end()
            }
        }

        let mut s = serializer.serialize_struct("Changeset", 3)?;
        s.serialize_field("changed", &Changed(&self.changed))?;
        s.serialize_field("added", &Entries(&self.added))?;
        s.serialize_field("removed", &Entries(&self.removed))?;
        s.end()
    }
}

// ============================================================================
// Entity schemas
// ============================================================================

/// Leaf fields of an entity, in schema order
pub trait EntityFields {
    const KIND: EntityKind;

    fn fields(&self) -> Vec<(&'static str, Value)>;
}

impl EntityFields for Power {
    const KIND: EntityKind = EntityKind::Power;

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("audio_power", self.audio_power.into()),
            ("usb_power", self.usb_power.into()),
        ]
    }
}

impl EntityFields for Source {
    const KIND: EntityKind = EntityKind::Source;

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.0.into()),
            ("name", self.name.as_str().into()),
            ("is_digital", self.is_digital.into()),
        ]
    }
}

impl EntityFields for Zone {
    const KIND: EntityKind = EntityKind::Zone;

    fn fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", self.id.0.into()),
            ("name", self.name.as_str().into()),
            ("source_id", self.source_id.0.into()),
            ("muted", self.muted.into()),
            ("standby", self.standby.into()),
            ("volume", self.volume.into()),
            ("disabled", self.disabled.into()),
        ]
    }
}

impl EntityFields for Group {
    const KIND: EntityKind = EntityKind::Group;

    fn fields(&self) -> Vec<(&'static str, Value)> {
        let zones: Vec<usize> = self.zones.iter().map(|z| z.0).collect();
        vec![
            ("id", self.id.0.into()),
            ("name", self.name.as_str().into()),
            ("zones", zones.into()),
        ]
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Compute the field-level difference between two snapshots
pub fn diff(old: &State, new: &State) -> Changeset {
    let mut changes = Changeset::default();

    changes.compare(None, &old.power, &new.power);
    diff_indexed(&mut changes, &old.sources, &new.sources);
    diff_indexed(&mut changes, &old.zones, &new.zones);
    diff_groups(&mut changes, &old.groups, &new.groups);

    changes
}

fn diff_indexed<E: EntityFields>(changes: &mut Changeset, old: &[E], new: &[E]) {
    for (index, (before, after)) in old.iter().zip(new).enumerate() {
        changes.compare(Some(index), before, after);
    }
    for (index, entity) in new.iter().enumerate().skip(old.len()) {
        Changeset::record(&mut changes.added, Some(index), entity);
    }
    for (index, entity) in old.iter().enumerate().skip(new.len()) {
        Changeset::record(&mut changes.removed, Some(index), entity);
    }
}

fn diff_groups(changes: &mut Changeset, old: &[Group], new: &[Group]) {
    for (index, group) in new.iter().enumerate() {
        match old.iter().find(|g| g.id == group.id) {
            Some(previous) => changes.compare(Some(index), previous, group),
            None => Changeset::record(&mut changes.added, Some(index), group),
        }
    }
    for (index, group) in old.iter().enumerate() {
        if !new.iter().any(|g| g.id == group.id) {
            Changeset::record(&mut changes.removed, Some(index), group);
        }
    }
}

// ============================================================================
// ChangeTracker - caller-owned "last seen" snapshot
// ============================================================================

/// Remembers the last state a caller has seen and reports what changed since
///
/// Each consumer (a UI, a test harness, a polling HTTP client) owns its own
/// tracker; nothing about it is shared or global.
#[derive(Debug, Clone)]
pub struct ChangeTracker {
    last: State,
}

impl ChangeTracker {
    pub fn new(initial: State) -> Self {
        Self { last: initial }
    }

    /// Diff `current` against the last seen state, then remember `current`
    pub fn update(&mut self, current: &State) -> Changeset {
        let changes = diff(&self.last, current);
        self.last = current.clone();
        changes
    }

    pub fn last_seen(&self) -> &State {
        &self.last
    }
}
