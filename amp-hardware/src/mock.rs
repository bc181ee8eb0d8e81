//! In-memory hardware backend

use std::collections::{BTreeMap, BTreeSet};

use amp_state::{Power, SourceId, ZoneId};
use parking_lot::Mutex;
use tracing::debug;

use crate::types::{
    HardwareCall, RawSourceStatus, RawStatus, RawZoneStatus, SourceConfig, ZoneUpdate,
};
use crate::{Hardware, HardwareError, Result};

#[derive(Default)]
struct Mirror {
    power: Option<Power>,
    sources: BTreeMap<SourceId, SourceConfig>,
    zones: BTreeMap<ZoneId, RawZoneStatus>,
}

#[derive(Default)]
struct Failures {
    power: bool,
    status: bool,
    sources: BTreeSet<SourceId>,
    zones: BTreeSet<ZoneId>,
}

/// Hardware stand-in that keeps what it was told in memory
///
/// Every attempted write is appended to the call log, including writes that
/// fail because of an injected failure. Only successful writes reach the
/// mirror that [`read_status`](Hardware::read_status) reports.
#[derive(Default)]
pub struct MockHardware {
    mirror: Mutex<Mirror>,
    calls: Mutex<Vec<HardwareCall>>,
    failures: Mutex<Failures>,
}

impl MockHardware {
    /// A device that has not reported anything yet
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose telemetry starts out as `status`
    pub fn with_status(status: RawStatus) -> Self {
        let mirror = Mirror {
            power: status.power,
            sources: status
                .sources
                .iter()
                .map(|s| (s.id, SourceConfig { is_digital: s.is_digital }))
                .collect(),
            zones: status.zones.iter().map(|z| (z.id, *z)).collect(),
        };
        Self {
            mirror: Mutex::new(mirror),
            ..Self::default()
        }
    }

    /// Every write attempted so far, oldest first
    pub fn calls(&self) -> Vec<HardwareCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Make writes to `id` fail until [`clear_failures`](Self::clear_failures)
    pub fn fail_zone(&self, id: ZoneId) {
        self.failures.lock().zones.insert(id);
    }

    pub fn fail_source(&self, id: SourceId) {
        self.failures.lock().sources.insert(id);
    }

    pub fn fail_power(&self) {
        self.failures.lock().power = true;
    }

    /// Make `read_status` report the device as unavailable
    pub fn fail_status(&self) {
        self.failures.lock().status = true;
    }

    pub fn clear_failures(&self) {
        *self.failures.lock() = Failures::default();
    }

    fn record(&self, call: HardwareCall) {
        debug!(?call, "mock hardware write");
        self.calls.lock().push(call);
    }
}

impl Hardware for MockHardware {
    fn apply_power(&self, power: Power) -> Result<()> {
        self.record(HardwareCall::Power(power));
        if self.failures.lock().power {
            return Err(HardwareError::rejected("power", "injected failure"));
        }
        self.mirror.lock().power = Some(power);
        Ok(())
    }

    fn apply_source(&self, id: SourceId, config: &SourceConfig) -> Result<()> {
        self.record(HardwareCall::Source(id, *config));
        if self.failures.lock().sources.contains(&id) {
            return Err(HardwareError::rejected(format!("source {id}"), "injected failure"));
        }
        self.mirror.lock().sources.insert(id, *config);
        Ok(())
    }

    fn apply_zone(&self, id: ZoneId, update: &ZoneUpdate) -> Result<()> {
        self.record(HardwareCall::Zone(id, *update));
        if self.failures.lock().zones.contains(&id) {
            return Err(HardwareError::rejected(format!("zone {id}"), "injected failure"));
        }
        self.mirror
            .lock()
            .zones
            .entry(id)
            .or_insert_with(|| RawZoneStatus::idle(id))
            .apply(update);
        Ok(())
    }

    fn read_status(&self) -> Result<RawStatus> {
        if self.failures.lock().status {
            return Err(HardwareError::Unavailable);
        }
        let mirror = self.mirror.lock();
        Ok(RawStatus {
            power: mirror.power,
            sources: mirror
                .sources
                .iter()
                .map(|(&id, config)| RawSourceStatus {
                    id,
                    is_digital: config.is_digital,
                })
                .collect(),
            zones: mirror.zones.values().copied().collect(),
        })
    }
}

impl std::fmt::Debug for MockHardware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHardware")
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}
