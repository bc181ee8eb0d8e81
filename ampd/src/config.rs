//! Daemon configuration file
//!
//! ```json
//! {
//!   "listen": "0.0.0.0:5000",
//!   "state_file": "/var/lib/ampd/state.json",
//!   "controller": { "zone_count": 12 }
//! }
//! ```
//!
//! Every field is optional; command line flags override the file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use amp_api::ControllerConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Address the HTTP API binds to
    pub listen: SocketAddr,

    /// Shape of the amplifier
    pub controller: ControllerConfig,

    /// Initial state to load instead of factory defaults
    pub state_file: Option<PathBuf>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 5000)),
            controller: ControllerConfig::default(),
            state_file: None,
        }
    }
}

impl DaemonConfig {
    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.controller.validate()?;
        Ok(config)
    }
}
