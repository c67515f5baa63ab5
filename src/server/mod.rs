//! HTTP service lifecycle
//!
//! Binds the listener, spawns the hub and serves the router until asked to
//! stop.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::http::create_router;
use crate::api::websocket::state::AppState;
use crate::config::{HubConfig, ServerConfig};
use crate::error::{Result, ServerError};
use crate::hub::HubHandle;

/// Handle returned by [`start`]; keeps the server task alive
pub struct ServerHandle {
    addr: SocketAddr,
    hub: HubHandle,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Handle to the hub behind this server
    pub fn hub(&self) -> &HubHandle {
        &self.hub
    }

    /// Stop accepting requests and wait for in-flight HTTP requests
    pub async fn shutdown(self) -> Result<()> {
        // The server may already have stopped on its own
        let _ = self.shutdown.send(());
        match self.server.await {
            Ok(result) => result.map_err(ServerError::from),
            Err(e) => Err(ServerError::Serve(std::io::Error::other(e))),
        }
    }
}

/// Bind the listener and start serving in the background
pub async fn start(config: &ServerConfig, hub_config: HubConfig) -> Result<ServerHandle> {
    let listen_addr = config.listen_addr();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: listen_addr.clone(),
            source,
        })?;
    let addr = listener.local_addr()?;

    let state = Arc::new(AppState::spawn(hub_config));
    let hub = state.hub.clone();
    let router = create_router(state, &config.cors_origins);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tracing::info!(%addr, "server listening");

    Ok(ServerHandle {
        addr,
        hub,
        shutdown: shutdown_tx,
        server,
    })
}

/// Serve until Ctrl-C, then shut down
pub async fn run(config: ServerConfig) -> Result<()> {
    let handle = start(&config, HubConfig::default()).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown signal received");

    handle.shutdown().await?;
    tracing::info!("server exiting");
    Ok(())
}
