use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use amp_api::AmpController;
use amp_hardware::MockHardware;
use amp_server::ApiServer;
use amp_state::State;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

mod config;
mod logging;

use config::DaemonConfig;
use logging::LoggingMode;

/// Multi-zone amplifier control daemon
///
/// Serves the command API over HTTP. State lives in memory; `--state` seeds
/// it from a JSON snapshot such as the one returned by `GET /api`.
#[derive(Parser, Debug)]
#[command(name = "ampd")]
#[command(version)]
pub struct Args {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address, overrides the config file
    #[arg(short, long)]
    pub listen: Option<SocketAddr>,

    /// Initial state JSON, overrides the config file
    #[arg(short, long)]
    pub state: Option<PathBuf>,

    /// Log mode (silent, development, debug, json); AMP_LOG_MODE when unset
    #[arg(long)]
    pub log_mode: Option<String>,
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if let Some(mode) = &self.log_mode {
            mode.parse::<LoggingMode>()?;
        }
        if let Some(path) = &self.state {
            if !path.is_file() {
                anyhow::bail!("state file {} does not exist", path.display());
            }
        }
        Ok(())
    }

    fn logging_mode(&self) -> Result<LoggingMode> {
        let mode = match &self.log_mode {
            Some(mode) => mode.parse()?,
            None => logging::mode_from_env(LoggingMode::Development)?,
        };
        Ok(mode)
    }

    /// Config file contents with the command line applied on top
    fn resolve(&self) -> Result<DaemonConfig> {
        let mut config = match &self.config {
            Some(path) => DaemonConfig::load(path)?,
            None => DaemonConfig::default(),
        };
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(state) = &self.state {
            config.state_file = Some(state.clone());
        }
        Ok(config)
    }
}

fn load_state(path: &Path, config: &DaemonConfig) -> Result<State> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    State::from_json(&text, config.controller.volume_range())
        .with_context(|| format!("loading state file {}", path.display()))
}

fn build_controller(config: &DaemonConfig) -> Result<AmpController> {
    let hardware = Arc::new(MockHardware::new());

    let controller = match &config.state_file {
        Some(path) => {
            let state = load_state(path, config)?;
            info!(path = %path.display(), "loaded initial state");
            AmpController::with_state(hardware, config.controller, state)?
        }
        None => AmpController::new(hardware, config.controller)?,
    };

    if let Err(err) = controller.refresh_from_hardware() {
        warn!(%err, "starting without hardware telemetry");
    }
    Ok(controller)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;
    logging::init_logging(args.logging_mode()?)?;

    let config = args.resolve()?;
    info!(
        listen = %config.listen,
        sources = config.controller.source_count,
        zones = config.controller.zone_count,
        "starting ampd"
    );

    let controller = Arc::new(build_controller(&config)?);
    let server = ApiServer::start(config.listen, controller)
        .await
        .context("starting API server")?;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown requested");
    server.shutdown().await;

    Ok(())
}
