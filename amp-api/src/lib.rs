//! Command engine for a multi-zone amplifier
//!
//! This crate turns commands into state changes and hardware writes:
//!
//! - [`operations`]: one typed payload per command, with boundary validation
//! - [`Command`]: the closed set of commands and the JSON envelope decoder
//! - [`AmpController`]: validates, stages and applies commands atomically
//! - [`CommandSurface`]: the call surface shared by direct and HTTP callers
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use amp_api::{AmpController, ControllerConfig, CreateGroup, SetGroup};
//! use amp_hardware::MockHardware;
//! use amp_state::{diff, SourceId, ZoneId};
//!
//! let controller =
//!     AmpController::new(Arc::new(MockHardware::new()), ControllerConfig::default()).unwrap();
//! let before = controller.get_state();
//!
//! let id = controller
//!     .create_group(CreateGroup::new("downstairs", [ZoneId(0), ZoneId(1)]))
//!     .unwrap();
//! controller
//!     .set_group(SetGroup::new(id).source(SourceId(2)))
//!     .unwrap();
//!
//! let changes = diff(&before, &controller.get_state());
//! assert_eq!(changes.changed.len(), 2);
//! assert_eq!(changes.added.len(), 3);
//!
//! // The same thing through a command envelope
//! let reply = controller.parse_cmd(&serde_json::json!({
//!     "command": "set_zone", "id": 0, "vol": -30
//! }));
//! assert!(reply.is_ok());
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod operations;

pub use command::{Command, CommandReply, CommandSurface};
pub use config::ControllerConfig;
pub use controller::AmpController;
pub use error::{ApiError, ErrorKind, Result, ValidationError};
pub use operations::{
    CreateGroup, DeleteGroup, SetGroup, SetPower, SetSource, SetZone, Validate,
};
