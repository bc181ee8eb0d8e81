//! Command engine for the amplifier
//!
//! [`AmpController`] owns the state store and the hardware handle. Every
//! operation runs inside one [`StateStore::transact`] call:
//!
//! 1. validate the request and everything it references,
//! 2. stage the logical changes on the transaction's copy of the state,
//! 3. push only the values that actually changed to the hardware, zones in
//!    ascending id order.
//!
//! If a hardware write fails, the writes already made by the same command are
//! undone (best effort) and the staged state is dropped, so the store never
//! holds a half-applied command.

use std::convert::Infallible;
use std::sync::Arc;

use amp_hardware::{Hardware, HardwareCall, HardwareError, SourceConfig, ZoneUpdate};
use amp_state::{Group, GroupId, Power, SourceId, State, StateStore, Transaction, Zone, ZoneId};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandReply, CommandSurface};
use crate::config::ControllerConfig;
use crate::error::{ApiError, Result, ValidationError};
use crate::operations::{
    CreateGroup, DeleteGroup, SetGroup, SetPower, SetSource, SetZone, Validate, ZonePatch,
};

/// The command engine
pub struct AmpController {
    store: StateStore,
    hardware: Arc<dyn Hardware>,
    config: ControllerConfig,
}

impl AmpController {
    /// Create a controller over a factory-default state shaped by `config`
    pub fn new(hardware: Arc<dyn Hardware>, config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        let state = State::with_counts(config.source_count, config.zone_count);
        Ok(Self {
            store: StateStore::new(state),
            hardware,
            config,
        })
    }

    /// Create a controller over a previously saved state
    ///
    /// The state is checked against the model invariants and the configured
    /// volume range. Its source and zone counts win over the configured ones.
    pub fn with_state(
        hardware: Arc<dyn Hardware>,
        config: ControllerConfig,
        state: State,
    ) -> Result<Self> {
        config.validate()?;
        state.validate(config.volume_range())?;
        Ok(Self {
            store: StateStore::new(state),
            hardware,
            config,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Snapshot of the current state
    pub fn get_state(&self) -> State {
        self.store.snapshot()
    }

    /// Overlay hardware telemetry onto the logical state
    ///
    /// Meant for startup. Entries the state cannot hold (unknown ids, dangling
    /// sources, volumes outside the configured range) are skipped with a
    /// warning. A failed status read leaves the state untouched.
    pub fn refresh_from_hardware(&self) -> Result<()> {
        let status = self.hardware.read_status().map_err(|err| {
            warn!(%err, "could not read hardware status, keeping current state");
            ApiError::from(err)
        })?;
        let range = self.config.volume_range();

        self.store.transact(|txn| {
            if let Some(power) = status.power {
                *txn.power_mut() = power;
            }

            for raw in &status.sources {
                match txn.source_mut(raw.id) {
                    Some(source) => source.is_digital = raw.is_digital,
                    None => warn!(id = %raw.id, "ignoring status for unknown source"),
                }
            }

            for raw in &status.zones {
                if txn.state().source(raw.source_id).is_none() || !range.contains(raw.volume) {
                    warn!(id = %raw.id, source_id = %raw.source_id, volume = raw.volume,
                        "ignoring implausible zone status");
                    continue;
                }
                match txn.zone_mut(raw.id) {
                    Some(zone) => {
                        zone.source_id = raw.source_id;
                        zone.muted = raw.muted;
                        zone.standby = raw.standby;
                        zone.volume = raw.volume;
                    }
                    None => warn!(id = %raw.id, "ignoring status for unknown zone"),
                }
            }

            Ok::<_, ApiError>(())
        })?;

        info!(
            sources = status.sources.len(),
            zones = status.zones.len(),
            "state refreshed from hardware"
        );
        Ok(())
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Overwrite both power rails
    pub fn set_power(&self, cmd: SetPower) -> Result<()> {
        cmd.validate_boundary()?;
        let power = Power::new(cmd.audio_power, cmd.usb_power);

        self.store.transact(|txn| {
            let previous = std::mem::replace(txn.power_mut(), power);
            if power != previous {
                HardwareBatch::new(self.hardware.as_ref()).power(power, previous)?;
            }
            Ok(())
        })
    }

    /// Rename and/or reconfigure one input
    pub fn set_source(&self, cmd: SetSource) -> Result<()> {
        cmd.validate_boundary()?;

        self.store.transact(|txn| {
            let source = txn
                .source_mut(cmd.id)
                .ok_or_else(|| ApiError::source_not_found(cmd.id))?;

            let previous = SourceConfig {
                is_digital: source.is_digital,
            };
            if let Some(name) = &cmd.name {
                source.name.clone_from(name);
            }
            if let Some(is_digital) = cmd.is_digital {
                source.is_digital = is_digital;
            }

            let config = SourceConfig {
                is_digital: source.is_digital,
            };
            if config != previous {
                HardwareBatch::new(self.hardware.as_ref()).source(cmd.id, config, previous)?;
            }
            Ok(())
        })
    }

    /// Partial update of one zone
    pub fn set_zone(&self, cmd: SetZone) -> Result<()> {
        cmd.validate_boundary()?;
        let patch = cmd.patch();

        self.store.transact(|txn| {
            if txn.state().zone(cmd.id).is_none() {
                return Err(ApiError::zone_not_found(cmd.id));
            }
            self.check_patch(txn.state(), &patch)?;

            let mut batch = HardwareBatch::new(self.hardware.as_ref());
            apply_patch(txn, &mut batch, cmd.id, &patch)
        })
    }

    /// Update a group and cascade zone settings to every member
    ///
    /// All members are validated before any of them is touched; the update
    /// then runs over the members in ascending zone id order. When `zones` is
    /// given the membership is replaced first and the new members receive the
    /// cascade.
    pub fn set_group(&self, cmd: SetGroup) -> Result<()> {
        cmd.validate_boundary()?;
        let patch = cmd.member_patch();

        self.store.transact(|txn| {
            let current = txn
                .state()
                .group(cmd.id)
                .ok_or_else(|| ApiError::group_not_found(cmd.id))?;

            let members = match &cmd.zones {
                Some(zones) => {
                    check_members_exist(txn.state(), zones)?;
                    zones.clone()
                }
                None => current.zones.clone(),
            };
            self.check_patch(txn.state(), &patch)?;

            let group = txn
                .group_mut(cmd.id)
                .ok_or_else(|| ApiError::group_not_found(cmd.id))?;
            if let Some(name) = &cmd.name {
                group.name.clone_from(name);
            }
            group.zones = members;
            let ordered = group.sorted_zones();

            let mut batch = HardwareBatch::new(self.hardware.as_ref());
            for zone in ordered {
                apply_patch(txn, &mut batch, zone, &patch)?;
            }
            Ok(())
        })
    }

    /// Create a group and return its freshly allocated id
    pub fn create_group(&self, cmd: CreateGroup) -> Result<GroupId> {
        cmd.validate_boundary()?;

        self.store.transact(|txn| {
            check_members_exist(txn.state(), &cmd.zones)?;

            let id = txn
                .allocate_group_id()
                .ok_or_else(|| ValidationError::custom("id", "group ids exhausted"))?;
            info!(%id, name = %cmd.name, zones = cmd.zones.len(), "group created");
            txn.push_group(Group::new(id, cmd.name, cmd.zones));
            Ok(id)
        })
    }

    /// Remove a group; its member zones keep their current settings
    pub fn delete_group(&self, cmd: DeleteGroup) -> Result<()> {
        cmd.validate_boundary()?;

        self.store.transact(|txn| {
            let group = txn
                .remove_group(cmd.id)
                .ok_or_else(|| ApiError::group_not_found(cmd.id))?;
            info!(id = %group.id, name = %group.name, "group deleted");
            Ok(())
        })
    }

    /// Run a typed command
    pub fn execute(&self, command: Command) -> Result<()> {
        let name = command.name();
        debug!(command = name, "executing command");

        let result = match command {
            Command::SetPower(cmd) => self.set_power(cmd),
            Command::SetSource(cmd) => self.set_source(cmd),
            Command::SetZone(cmd) => self.set_zone(cmd),
            Command::SetGroup(cmd) => self.set_group(cmd),
            Command::CreateGroup(cmd) => self.create_group(cmd).map(|_| ()),
            Command::DeleteGroup(cmd) => self.delete_group(cmd),
        };

        if let Err(err) = &result {
            debug!(command = name, kind = %err.kind(), %err, "command rejected");
        }
        result
    }

    /// Decode a command envelope and run it
    pub fn parse_cmd(&self, envelope: &Value) -> Result<()> {
        let command = Command::from_envelope(envelope).map_err(|err| {
            debug!(kind = %err.kind(), %err, "envelope rejected");
            err
        })?;
        self.execute(command)
    }

    // ========================================================================
    // Validation helpers
    // ========================================================================

    /// State-dependent checks of a zone update
    fn check_patch(&self, state: &State, patch: &ZonePatch<'_>) -> Result<()> {
        if let Some(source_id) = patch.source_id {
            check_source_exists(state, source_id)?;
        }

        if let Some(volume) = patch.volume {
            let range = self.config.volume_range();
            if !range.contains(volume) {
                return Err(
                    ValidationError::range_error("volume", range.min, range.max, volume).into(),
                );
            }
        }
        Ok(())
    }
}

impl CommandSurface for AmpController {
    type Error = Infallible;

    fn state(&self) -> std::result::Result<State, Infallible> {
        Ok(self.get_state())
    }

    fn submit(&self, envelope: &Value) -> std::result::Result<CommandReply, Infallible> {
        Ok(self.parse_cmd(envelope).into())
    }
}

impl std::fmt::Debug for AmpController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmpController")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn check_source_exists(state: &State, id: SourceId) -> Result<()> {
    match state.source(id) {
        Some(_) => Ok(()),
        None => Err(ValidationError::invalid_value("source_id", id, "no such source").into()),
    }
}

fn check_members_exist(state: &State, zones: &[ZoneId]) -> Result<()> {
    match zones.iter().find(|&&id| state.zone(id).is_none()) {
        Some(missing) => {
            Err(ValidationError::invalid_value("zones", missing, "no such zone").into())
        }
        None => Ok(()),
    }
}

// ============================================================================
// Staging
// ============================================================================

/// Stage `patch` on one zone and push what changed to the hardware
fn apply_patch(
    txn: &mut Transaction,
    batch: &mut HardwareBatch<'_>,
    id: ZoneId,
    patch: &ZonePatch<'_>,
) -> Result<()> {
    let zone = txn
        .zone_mut(id)
        .ok_or_else(|| ApiError::zone_not_found(id))?;

    let (update, undo) = stage_zone(zone, patch);
    if update.is_empty() {
        return Ok(());
    }
    batch.zone(id, update, undo)
}

/// Apply `patch` to `zone`, returning the hardware update and its inverse
fn stage_zone(zone: &mut Zone, patch: &ZonePatch<'_>) -> (ZoneUpdate, ZoneUpdate) {
    let mut update = ZoneUpdate::default();
    let mut undo = ZoneUpdate::default();

    if let Some(name) = patch.name {
        if zone.name != name {
            zone.name = name.to_string();
        }
    }
    if let Some(disabled) = patch.disabled {
        zone.disabled = disabled;
    }

    stage(&mut zone.source_id, patch.source_id, &mut update.source_id, &mut undo.source_id);
    stage(&mut zone.muted, patch.muted, &mut update.muted, &mut undo.muted);
    stage(&mut zone.standby, patch.standby, &mut update.standby, &mut undo.standby);
    stage(&mut zone.volume, patch.volume, &mut update.volume, &mut undo.volume);

    (update, undo)
}

fn stage<T: Copy + PartialEq>(
    field: &mut T,
    wanted: Option<T>,
    update: &mut Option<T>,
    undo: &mut Option<T>,
) {
    if let Some(value) = wanted {
        if value != *field {
            *undo = Some(*field);
            *update = Some(value);
            *field = value;
        }
    }
}

// ============================================================================
// HardwareBatch - writes of one command, with their inverses
// ============================================================================

/// Hardware writes issued by one command
///
/// Every successful write records the call that would undo it. The first
/// failing write replays those undo calls newest first and returns the error.
struct HardwareBatch<'a> {
    hardware: &'a dyn Hardware,
    undo: Vec<HardwareCall>,
}

impl<'a> HardwareBatch<'a> {
    fn new(hardware: &'a dyn Hardware) -> Self {
        Self {
            hardware,
            undo: Vec::new(),
        }
    }

    fn power(&mut self, power: Power, previous: Power) -> Result<()> {
        let result = self.hardware.apply_power(power);
        self.settle(result, HardwareCall::Power(previous))
    }

    fn source(&mut self, id: SourceId, config: SourceConfig, previous: SourceConfig) -> Result<()> {
        let result = self.hardware.apply_source(id, &config);
        self.settle(result, HardwareCall::Source(id, previous))
    }

    fn zone(&mut self, id: ZoneId, update: ZoneUpdate, undo: ZoneUpdate) -> Result<()> {
        let result = self.hardware.apply_zone(id, &update);
        self.settle(result, HardwareCall::Zone(id, undo))
    }

    fn settle(
        &mut self,
        result: std::result::Result<(), HardwareError>,
        undo: HardwareCall,
    ) -> Result<()> {
        match result {
            Ok(()) => {
                self.undo.push(undo);
                Ok(())
            }
            Err(err) => {
                warn!(%err, applied = self.undo.len(), "hardware write failed, rolling back command");
                self.rollback();
                Err(err.into())
            }
        }
    }

    fn rollback(&mut self) {
        while let Some(call) = self.undo.pop() {
            let result = match &call {
                HardwareCall::Power(power) => self.hardware.apply_power(*power),
                HardwareCall::Source(id, config) => self.hardware.apply_source(*id, config),
                HardwareCall::Zone(id, update) => self.hardware.apply_zone(*id, update),
            };
            if let Err(err) = result {
                warn!(?call, %err, "rollback write failed, hardware may differ from state");
            }
        }
    }
}
