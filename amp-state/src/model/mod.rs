//! Model types for amp-state

mod entity_kind;
mod group;
mod ids;
mod power;
mod source;
mod state;
mod zone;

pub use entity_kind::EntityKind;
pub use group::Group;
pub use ids::{GroupId, SourceId, ZoneId};
pub use power::Power;
pub use source::Source;
pub use state::{State, VolumeRange};
pub use zone::Zone;
