//! API server lifecycle

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use amp_api::AmpController;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::error::ServerError;
use crate::routes::routes;

/// HTTP server exposing one controller
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use amp_api::{AmpController, ControllerConfig};
/// use amp_hardware::MockHardware;
/// use amp_server::ApiServer;
///
/// #[tokio::main]
/// async fn main() {
///     let controller =
///         AmpController::new(Arc::new(MockHardware::new()), ControllerConfig::default()).unwrap();
///     let server = ApiServer::start("127.0.0.1:0".parse().unwrap(), Arc::new(controller))
///         .await
///         .unwrap();
///     println!("listening at {}", server.base_url());
///     server.shutdown().await;
/// }
/// ```
pub struct ApiServer {
    local_addr: SocketAddr,
    base_url: String,
    /// Shutdown signal sender
    shutdown_tx: Option<mpsc::Sender<()>>,
    /// Server task handle
    server_handle: Option<JoinHandle<()>>,
}

impl ApiServer {
    /// Bind `addr` and start serving `controller`
    ///
    /// Port 0 picks a free port; [`local_addr`](Self::local_addr) reports the
    /// one actually bound. Must be called from within a tokio runtime.
    pub async fn start(
        addr: SocketAddr,
        controller: Arc<AmpController>,
    ) -> Result<Self, ServerError> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let (local_addr, server) = warp::serve(routes(controller))
            .try_bind_with_graceful_shutdown(addr, async move {
                shutdown_rx.recv().await;
            })
            .map_err(|err| ServerError::Bind {
                addr,
                reason: err.to_string(),
            })?;

        let server_handle = tokio::spawn(server);

        let base_url = format!("http://{}", Self::reachable(local_addr));
        info!(%local_addr, %base_url, "API server listening");

        Ok(Self {
            local_addr,
            base_url,
            shutdown_tx: Some(shutdown_tx),
            server_handle: Some(server_handle),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL a local client should use, e.g. `http://127.0.0.1:5000`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }

        if let Some(handle) = self.server_handle.take() {
            let _ = handle.await;
        }
        info!(local_addr = %self.local_addr, "API server stopped");
    }

    /// A wildcard bind is reached through loopback
    fn reachable(addr: SocketAddr) -> SocketAddr {
        if addr.ip().is_unspecified() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), addr.port())
        } else {
            addr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amp_api::ControllerConfig;
    use amp_hardware::MockHardware;

    fn controller() -> Arc<AmpController> {
        let hw = Arc::new(MockHardware::new());
        Arc::new(AmpController::new(hw, ControllerConfig::default()).unwrap())
    }

    #[test]
    fn test_reachable_replaces_wildcard() {
        let addr: SocketAddr = "0.0.0.0:5000".parse().unwrap();
        assert_eq!(ApiServer::reachable(addr).to_string(), "127.0.0.1:5000");
        let addr: SocketAddr = "192.168.1.20:80".parse().unwrap();
        assert_eq!(ApiServer::reachable(addr), addr);
    }

    #[tokio::test]
    async fn test_start_on_ephemeral_port_and_shutdown() {
        let server = ApiServer::start("127.0.0.1:0".parse().unwrap(), controller())
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(
            server.base_url(),
            format!("http://127.0.0.1:{}", server.local_addr().port())
        );
        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let first = ApiServer::start("127.0.0.1:0".parse().unwrap(), controller())
            .await
            .unwrap();
        let result = ApiServer::start(first.local_addr(), controller()).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
        first.shutdown().await;
    }
}
