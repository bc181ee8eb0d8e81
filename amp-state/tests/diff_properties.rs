//! Property-based tests for snapshot diffing and the group id counter

use proptest::prelude::*;

use amp_state::{diff, Group, GroupId, SourceId, State, StateStore, ZoneId};

// ============================================================================
// Strategies
// ============================================================================

/// A valid state with 1..6 sources, 1..8 zones and a few groups
fn state_strategy() -> impl Strategy<Value = State> {
    (1usize..6, 1usize..8)
        .prop_flat_map(|(sources, zones)| {
            (
                Just((sources, zones)),
                any::<(bool, bool)>(),
                prop::collection::vec((0..sources, -80i32..=0, any::<bool>()), zones),
                prop::collection::vec(
                    prop::sample::subsequence((0..zones).collect::<Vec<_>>(), 1..=zones),
                    0..4,
                ),
            )
        })
        .prop_map(|((sources, zones), power, zone_values, groups)| {
            let mut state = State::with_counts(sources, zones);
            state.power.audio_power = power.0;
            state.power.usb_power = power.1;
            for (zone, (source, volume, muted)) in state.zones.iter_mut().zip(zone_values) {
                zone.source_id = SourceId(source);
                zone.volume = volume;
                zone.muted = muted;
            }
            state.groups = groups
                .into_iter()
                .enumerate()
                .map(|(i, members)| {
                    Group::new(
                        GroupId(i as u32),
                        format!("group {i}"),
                        members.into_iter().map(ZoneId).collect(),
                    )
                })
                .collect();
            state
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A state never differs from itself
    #[test]
    fn prop_self_diff_is_empty(state in state_strategy()) {
        prop_assert!(diff(&state, &state.clone()).is_empty());
    }

    /// A single volume edit yields exactly one changed field carrying old and new values
    #[test]
    fn prop_single_edit_is_single_change(state in state_strategy(), pick in any::<prop::sample::Index>()) {
        let zone = pick.index(state.zones.len());
        let mut edited = state.clone();
        edited.zones[zone].volume = if state.zones[zone].volume == 0 { -1 } else { 0 };

        let changes = diff(&state, &edited);
        prop_assert_eq!(changes.changed.len(), 1);
        prop_assert!(changes.added.is_empty());
        prop_assert!(changes.removed.is_empty());
        prop_assert_eq!(changes.changed[0].path.to_string(), format!("zones[{zone}].volume"));
        prop_assert_eq!(changes.changed[0].old.clone(), serde_json::json!(state.zones[zone].volume));
    }

    /// Dropping every group reports each one as removed and nothing as changed
    #[test]
    fn prop_clearing_groups_only_removes(state in state_strategy()) {
        let mut cleared = state.clone();
        cleared.groups.clear();

        let changes = diff(&state, &cleared);
        prop_assert!(changes.changed.is_empty());
        prop_assert_eq!(changes.removed.len(), state.groups.len() * 3);
    }

    /// Allocated group ids strictly increase no matter how groups are created and removed
    #[test]
    fn prop_group_ids_strictly_increase(ops in prop::collection::vec(any::<bool>(), 1..40)) {
        let store = StateStore::new(State::with_counts(1, 2));
        let mut last: Option<GroupId> = None;

        for create in ops {
            if create {
                let id = store
                    .transact(|txn| {
                        let id = txn.allocate_group_id().ok_or(())?;
                        txn.push_group(Group::new(id, "g", vec![ZoneId(0)]));
                        Ok::<_, ()>(id)
                    })
                    .unwrap();
                if let Some(previous) = last {
                    prop_assert!(id > previous);
                }
                last = Some(id);
            } else {
                store
                    .transact(|txn| {
                        if let Some(id) = txn.state().groups.first().map(|g| g.id) {
                            txn.remove_group(id);
                        }
                        Ok::<_, ()>(())
                    })
                    .unwrap();
            }
        }
    }
}
