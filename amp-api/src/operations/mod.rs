//! Typed command payloads
//!
//! One payload struct per command kind. Each carries the fields of its
//! command envelope, accepts the legacy short field names, and checks what
//! can be checked without looking at the current state through [`Validate`].
//! Checks against the state (ids exist, volume in range) happen in the engine.

use std::collections::HashSet;

use amp_state::ZoneId;

use crate::error::ValidationError;

pub mod group;
pub mod power;
pub mod source;
pub mod zone;

pub use group::{CreateGroup, DeleteGroup, SetGroup};
pub use power::SetPower;
pub use source::SetSource;
pub use zone::SetZone;

pub(crate) use zone::ZonePatch;

/// Trait for payloads that can be checked on their own
pub trait Validate {
    /// Perform light validation at the API boundary
    ///
    /// Only the request itself is inspected; state-dependent checks run
    /// later, inside the command's transaction.
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        Ok(()) // Default: no boundary validation
    }
}

/// Names may be changed but never blanked
pub(crate) fn check_name(parameter: &str, name: Option<&str>) -> Result<(), ValidationError> {
    match name {
        Some(name) if name.trim().is_empty() => Err(ValidationError::invalid_value(
            parameter,
            name,
            "must not be empty",
        )),
        _ => Ok(()),
    }
}

/// A group member list must be non-empty and free of duplicates
pub(crate) fn check_members(zones: &[ZoneId]) -> Result<(), ValidationError> {
    if zones.is_empty() {
        return Err(ValidationError::custom("zones", "a group needs at least one zone"));
    }

    let mut seen = HashSet::with_capacity(zones.len());
    for zone in zones {
        if !seen.insert(zone) {
            return Err(ValidationError::invalid_value(
                "zones",
                zone,
                "zone listed more than once",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![0, 1, 2], true)]
    #[case(vec![3], true)]
    #[case(vec![], false)]
    #[case(vec![1, 2, 1], false)]
    fn test_check_members(#[case] zones: Vec<usize>, #[case] ok: bool) {
        let zones: Vec<ZoneId> = zones.into_iter().map(ZoneId).collect();
        assert_eq!(check_members(&zones).is_ok(), ok);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("Kitchen"), true)]
    #[case(Some(""), false)]
    #[case(Some("   "), false)]
    fn test_check_name(#[case] name: Option<&str>, #[case] ok: bool) {
        assert_eq!(check_name("name", name).is_ok(), ok);
    }
}
