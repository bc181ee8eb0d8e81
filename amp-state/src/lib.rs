//! Amplifier State Library
//!
//! Holds the single authoritative description of a multi-zone amplifier:
//! power rails, fixed audio sources, fixed output zones, and dynamic groups
//! of zones. Also provides snapshot diffing so callers can see what a
//! command changed.
//!
//! # Features
//!
//! - **Typed model**: `State`, `Source`, `Zone`, `Group`, `Power` with id newtypes
//! - **Atomic writes**: all changes of a `transact` call commit together or not at all
//! - **Change detection**: schema-ordered, field-level diffs between snapshots
//!
//! # Quick Start
//!
//! ```rust
//! use amp_state::{diff, ChangeTracker, State, StateStore, ZoneId};
//!
//! let store = StateStore::new(State::with_counts(4, 6));
//! let mut tracker = ChangeTracker::new(store.snapshot());
//!
//! store
//!     .transact(|txn| {
//!         if let Some(zone) = txn.zone_mut(ZoneId(1)) {
//!             zone.muted = true;
//!         }
//!         Ok::<_, ()>(())
//!     })
//!     .unwrap();
//!
//! let changes = tracker.update(&store.snapshot());
//! assert_eq!(changes.changed[0].path.to_string(), "zones[1].muted");
//! ```
//!
//! # Architecture
//!
//! ```text
//! StateStore
//!     │
//!     └── Arc<RwLock<Inner>>
//!             ├── state: State { power, sources, zones, groups }
//!             └── next_group_id (monotonic)
//!
//! diff(&State, &State) -> Changeset { changed, added, removed }
//! ```

// Modules
pub mod diff;
pub mod error;
pub mod model;
pub mod store;

// Re-exports - Public API
pub use diff::{diff, ChangeTracker, Changeset, EntityFields, FieldChange, FieldEntry, FieldPath};
pub use error::{Result, StateError};
pub use model::{
    EntityKind, Group, GroupId, Power, Source, SourceId, State, VolumeRange, Zone, ZoneId,
};
pub use store::{StateStore, Transaction};
