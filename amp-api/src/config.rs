//! Configuration for the command engine

use amp_state::VolumeRange;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Configuration for an [`AmpController`](crate::AmpController)
///
/// Fixes the shape of the amplifier for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Number of audio inputs
    /// Default: 4
    pub source_count: usize,

    /// Number of audio outputs
    /// Default: 6
    pub zone_count: usize,

    /// Lowest accepted zone volume in dB
    /// Default: -80
    pub volume_min: i32,

    /// Highest accepted zone volume in dB
    /// Default: 0
    pub volume_max: i32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            source_count: 4,
            zone_count: 6,
            volume_min: -80,
            volume_max: 0,
        }
    }
}

impl ControllerConfig {
    /// Create a new ControllerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// A main unit with one expansion unit chained to it
    pub fn with_expander() -> Self {
        Self {
            zone_count: 12,
            ..Default::default()
        }
    }

    /// Override the source and zone counts
    pub fn with_counts(self, source_count: usize, zone_count: usize) -> Self {
        Self {
            source_count,
            zone_count,
            ..self
        }
    }

    pub fn volume_range(&self) -> VolumeRange {
        VolumeRange::new(self.volume_min, self.volume_max)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_count == 0 {
            return Err(ValidationError::invalid_value(
                "source_count",
                self.source_count,
                "zones need at least one source to play",
            ));
        }

        if self.volume_min > self.volume_max {
            return Err(ValidationError::invalid_value(
                "volume_min",
                self.volume_min,
                format!("must not exceed volume_max ({})", self.volume_max),
            ));
        }

        Ok(())
    }
}
