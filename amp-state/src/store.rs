//! Canonical state storage
//!
//! This module provides the single authoritative copy of the amplifier state:
//! - `StateStore`: shared handle to the state and the group id counter
//! - `Transaction`: staged copy of the state handed to writers

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::model::{Group, GroupId, Power, Source, SourceId, State, Zone, ZoneId};

// ============================================================================
// StateStore - shared, lock-protected state
// ============================================================================

struct Inner {
    state: State,
    /// Next id handed out by `allocate_group_id`; only ever grows, `None`
    /// once every id has been used
    next_group_id: Option<u32>,
}

/// Shared handle to the canonical amplifier state
///
/// Cloning the store shares the underlying state. Reads take a consistent
/// snapshot; writes go through [`StateStore::transact`], which serializes
/// writers and commits all of a writer's changes or none of them.
///
/// # Example
///
/// ```rust
/// use amp_state::{State, StateStore, ZoneId};
///
/// let store = StateStore::new(State::with_counts(4, 6));
///
/// store
///     .transact(|txn| {
///         let zone = txn.zone_mut(ZoneId(2)).ok_or("no such zone")?;
///         zone.volume = -30;
///         Ok::<_, &str>(())
///     })
///     .unwrap();
///
/// assert_eq!(store.snapshot().zones[2].volume, -30);
/// ```
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<RwLock<Inner>>,
}

impl StateStore {
    /// Create a store holding `state`
    ///
    /// The group id counter resumes after the highest id already present.
    /// A state already holding `GroupId(u32::MAX)` starts out exhausted.
    pub fn new(state: State) -> Self {
        let next_group_id = match state.max_group_id() {
            Some(id) => id.0.checked_add(1),
            None => Some(0),
        };
        Self {
            inner: Arc::new(RwLock::new(Inner {
                state,
                next_group_id,
            })),
        }
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> State {
        self.inner.read().state.clone()
    }

    /// Run `f` against the current state while holding the store read lock
    pub fn read<T>(&self, f: impl FnOnce(&State) -> T) -> T {
        f(&self.inner.read().state)
    }

    /// Id the next created group will receive, `None` when ids are exhausted
    pub fn next_group_id(&self) -> Option<GroupId> {
        self.inner.read().next_group_id.map(GroupId)
    }

    /// Apply a set of changes atomically
    ///
    /// `f` receives a [`Transaction`] over a staged copy of the state. If it
    /// returns `Ok` the staged copy replaces the current state; if it returns
    /// `Err` every staged change is dropped. The write lock is held for the
    /// whole call, so readers observe either the state before or after `f`.
    pub fn transact<T, E>(
        &self,
        f: impl FnOnce(&mut Transaction) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let mut inner = self.inner.write();
        let mut txn = Transaction {
            state: inner.state.clone(),
            next_group_id: inner.next_group_id,
        };

        let output = f(&mut txn)?;

        inner.state = txn.state;
        inner.next_group_id = txn.next_group_id;
        trace!(next_group_id = ?inner.next_group_id, "state committed");
        Ok(output)
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(State::with_counts(0, 0))
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("StateStore")
            .field("sources", &inner.state.sources.len())
            .field("zones", &inner.state.zones.len())
            .field("groups", &inner.state.groups.len())
            .field("next_group_id", &inner.next_group_id)
            .finish()
    }
}

// ============================================================================
// Transaction - staged writes
// ============================================================================

/// Staged copy of the state handed to [`StateStore::transact`]
///
/// Only structural access is offered here: ids out of range give `None`.
/// Semantic validation belongs to the caller.
pub struct Transaction {
    state: State,
    next_group_id: Option<u32>,
}

impl Transaction {
    /// The staged state, including changes made so far
    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn power_mut(&mut self) -> &mut Power {
        &mut self.state.power
    }

    pub fn source_mut(&mut self, id: SourceId) -> Option<&mut Source> {
        self.state.sources.get_mut(id.0)
    }

    pub fn zone_mut(&mut self, id: ZoneId) -> Option<&mut Zone> {
        self.state.zones.get_mut(id.0)
    }

    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.state.groups.iter_mut().find(|g| g.id == id)
    }

    /// Reserve the next group id
    ///
    /// The reservation only sticks if the transaction commits. Returns `None`
    /// once `GroupId(u32::MAX)` has been handed out.
    pub fn allocate_group_id(&mut self) -> Option<GroupId> {
        let id = self.next_group_id?;
        self.next_group_id = id.checked_add(1);
        Some(GroupId(id))
    }

    /// Append a group; the caller is responsible for the id being fresh
    pub fn push_group(&mut self, group: Group) {
        self.state.groups.push(group);
    }

    /// Remove a group, returning its last content
    pub fn remove_group(&mut self, id: GroupId) -> Option<Group> {
        let position = self.state.groups.iter().position(|g| g.id == id)?;
        Some(self.state.groups.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_committed_changes() {
        let store = StateStore::new(State::with_counts(4, 6));

        store
            .transact(|txn| {
                txn.power_mut().audio_power = true;
                txn.source_mut(SourceId(1)).unwrap().name = "cd player".to_string();
                Ok::<_, ()>(())
            })
            .unwrap();

        let state = store.snapshot();
        assert!(state.power.audio_power);
        assert_eq!(state.sources[1].name, "cd player");
    }

    #[test]
    fn test_failed_transaction_discards_everything() {
        let store = StateStore::new(State::with_counts(4, 6));
        let before = store.snapshot();

        let result = store.transact(|txn| {
            txn.zone_mut(ZoneId(0)).unwrap().volume = -10;
            txn.zone_mut(ZoneId(1)).unwrap().muted = true;
            let id = txn.allocate_group_id().unwrap();
            txn.push_group(Group::new(id, "doomed", vec![ZoneId(0)]));
            Err::<(), _>("hardware said no")
        });

        assert_eq!(result, Err("hardware said no"));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.next_group_id(), Some(GroupId(0)));
    }

    #[test]
    fn test_out_of_range_ids_are_none() {
        let store = StateStore::new(State::with_counts(2, 2));
        store
            .transact(|txn| {
                assert!(txn.source_mut(SourceId(2)).is_none());
                assert!(txn.zone_mut(ZoneId(7)).is_none());
                assert!(txn.group_mut(GroupId(0)).is_none());
                assert!(txn.remove_group(GroupId(0)).is_none());
                Ok::<_, ()>(())
            })
            .unwrap();
    }

    #[test]
    fn test_group_ids_are_never_reused() {
        let store = StateStore::new(State::with_counts(1, 2));

        let first = store
            .transact(|txn| {
                let id = txn.allocate_group_id().unwrap();
                txn.push_group(Group::new(id, "a", vec![ZoneId(0)]));
                Ok::<_, ()>(id)
            })
            .unwrap();

        store
            .transact(|txn| {
                txn.remove_group(first);
                Ok::<_, ()>(())
            })
            .unwrap();

        let second = store
            .transact(|txn| txn.allocate_group_id().ok_or(()))
            .unwrap();

        assert_eq!(first, GroupId(0));
        assert_eq!(second, GroupId(1));
    }

    #[test]
    fn test_counter_resumes_after_loaded_groups() {
        let mut state = State::with_counts(1, 1);
        state.groups.push(Group::new(GroupId(4), "x", vec![ZoneId(0)]));
        state.groups.push(Group::new(GroupId(2), "y", vec![ZoneId(0)]));

        let store = StateStore::new(state);
        assert_eq!(store.next_group_id(), Some(GroupId(5)));
    }

    #[test]
    fn test_counter_exhausts_instead_of_wrapping() {
        let mut state = State::with_counts(1, 1);
        state.groups.push(Group::new(GroupId(u32::MAX - 1), "x", vec![ZoneId(0)]));
        let store = StateStore::new(state);
        assert_eq!(store.next_group_id(), Some(GroupId(u32::MAX)));

        let last = store
            .transact(|txn| txn.allocate_group_id().ok_or(()))
            .unwrap();
        assert_eq!(last, GroupId(u32::MAX));
        assert_eq!(store.next_group_id(), None);

        let result = store.transact(|txn| txn.allocate_group_id().ok_or(()));
        assert_eq!(result, Err(()));
    }

    #[test]
    fn test_store_over_max_group_id_starts_exhausted() {
        let mut state = State::with_counts(1, 1);
        state.groups.push(Group::new(GroupId(u32::MAX), "x", vec![ZoneId(0)]));
        let store = StateStore::new(state);
        assert_eq!(store.next_group_id(), None);
    }

    #[test]
    fn test_store_clone_shares_state() {
        let store1 = StateStore::new(State::with_counts(1, 1));
        let store2 = store1.clone();

        store1
            .transact(|txn| {
                txn.power_mut().usb_power = true;
                Ok::<_, ()>(())
            })
            .unwrap();

        assert!(store2.read(|s| s.power.usb_power));
    }

    #[test]
    fn test_readers_never_see_partial_writes() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        let store = StateStore::new(State::with_counts(1, 6));
        let done = Arc::new(AtomicBool::new(false));

        let reader = {
            let store = store.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    let state = store.snapshot();
                    let first = state.zones[0].volume;
                    assert!(state.zones.iter().all(|z| z.volume == first));
                }
            })
        };

        for volume in (-60..0).rev() {
            store
                .transact(|txn| {
                    for id in 0..6 {
                        txn.zone_mut(ZoneId(id)).unwrap().volume = volume;
                    }
                    Ok::<_, ()>(())
                })
                .unwrap();
        }

        done.store(true, Ordering::Relaxed);
        reader.join().unwrap();
    }
}
