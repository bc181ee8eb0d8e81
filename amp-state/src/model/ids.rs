//! Identity types for sources, zones and groups

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate common ID type implementations
macro_rules! impl_id_type {
    ($name:ident, $inner:ty) => {
        impl $name {
            pub fn new(id: $inner) -> Self {
                Self(id)
            }

            pub fn get(&self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                $name(id)
            }
        }
    };
}

/// Index of a fixed audio input
///
/// Source ids are dense (`0..source_count`) and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(pub usize);

impl_id_type!(SourceId, usize);

/// Index of a fixed audio output path
///
/// Zone ids are dense (`0..zone_count`) and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub usize);

impl_id_type!(ZoneId, usize);

/// Identifier of a dynamically created group
///
/// Assigned on creation from a strictly increasing counter; a deleted
/// group's id is never handed out again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl_id_type!(GroupId, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_as_bare_integers() {
        assert_eq!(serde_json::to_string(&ZoneId(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&GroupId(12)).unwrap(), "12");
        let id: SourceId = serde_json::from_str("2").unwrap();
        assert_eq!(id, SourceId(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ZoneId::new(5)), "5");
        assert_eq!(format!("{}", GroupId::from(7)), "7");
        assert_eq!(SourceId::new(1).get(), 1);
    }
}
