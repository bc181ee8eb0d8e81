//! Power command

use serde::{Deserialize, Serialize};

use super::Validate;

/// Overwrite both power rails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPower {
    pub audio_power: bool,
    pub usb_power: bool,
}

impl SetPower {
    pub fn new(audio_power: bool, usb_power: bool) -> Self {
        Self {
            audio_power,
            usb_power,
        }
    }
}

impl Validate for SetPower {}
