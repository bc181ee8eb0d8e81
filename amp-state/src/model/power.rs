//! Power flags

use serde::{Deserialize, Serialize};

/// Process-wide power rails of the amplifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    /// Analog preamp supply
    pub audio_power: bool,
    /// USB supply for the digital inputs
    pub usb_power: bool,
}

impl Power {
    pub fn new(audio_power: bool, usb_power: bool) -> Self {
        Self {
            audio_power,
            usb_power,
        }
    }
}
