//! Hardware abstraction for the amplifier
//!
//! The control plane never talks to a device directly. It goes through the
//! [`Hardware`] trait, which has four calls: push power, push one source's
//! input configuration, push the changed settings of one zone, and read back
//! status telemetry.
//!
//! [`MockHardware`] is an in-memory backend that mirrors every accepted write,
//! records every attempted one, and can be told to fail.

pub mod error;
pub mod mock;
pub mod types;

pub use error::HardwareError;
pub use mock::MockHardware;
pub use types::{
    HardwareCall, RawSourceStatus, RawStatus, RawZoneStatus, SourceConfig, ZoneUpdate,
};

use amp_state::{Power, SourceId, ZoneId};

/// Result type for hardware calls
pub type Result<T> = std::result::Result<T, HardwareError>;

/// A device (or a stand-in for one) that carries out state changes
///
/// Implementations must be callable from several threads; the engine
/// serializes writes itself, so no ordering guarantees are needed here.
pub trait Hardware: Send + Sync {
    /// Set both power rails
    fn apply_power(&self, power: Power) -> Result<()>;

    /// Configure one input
    fn apply_source(&self, id: SourceId, config: &SourceConfig) -> Result<()>;

    /// Push the fields present in `update` to one output
    fn apply_zone(&self, id: ZoneId, update: &ZoneUpdate) -> Result<()>;

    /// Read the device's current settings
    fn read_status(&self) -> Result<RawStatus>;
}
