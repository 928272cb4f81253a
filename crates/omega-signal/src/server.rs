//! Listener and accept loop.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use omega_config::OmegaConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tracing::{info, warn};

use crate::connection::handle_connection;
use crate::hub::Hub;
use crate::presence::LiveStatusStore;

pub struct Server {
    listener: TcpListener,
    hub: Hub,
    allowed_origin: Option<String>,
}

impl Server {
    pub async fn bind(
        config: &OmegaConfig,
        store: Arc<dyn LiveStatusStore>,
    ) -> omega_common::Result<Self> {
        let listener = TcpListener::bind(config.server.bind_addr()).await?;
        Ok(Self {
            listener,
            hub: Hub::new(config, store),
            allowed_origin: config.server.allowed_origin.clone(),
        })
    }

    pub fn local_addr(&self) -> omega_common::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    /// Accept connections until `shutdown` resolves, then mark every live
    /// account not live and wait for those writes.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutting down, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => self.spawn_connection(stream, addr),
                        Err(e) => {
                            warn!(error = %e, "TCP accept error");
                        }
                    }
                }
            }
        }

        // Connection tasks die with the runtime, so their disconnect
        // cleanup never runs. Settle the live flags here instead.
        self.hub.presence().clear_all().await;
        self.hub.presence().flush().await;
    }

    fn spawn_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let hub = self.hub.clone();
        let allowed = self.allowed_origin.clone();
        tokio::spawn(async move {
            let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                check_origin(allowed.as_deref(), req)?;
                Ok(resp)
            };
            match accept_hdr_async(stream, callback).await {
                Ok(ws) => handle_connection(ws, addr, hub).await,
                Err(e) => {
                    warn!(peer = %addr, error = %e, "WS handshake failed");
                }
            }
        });
    }
}

/// Refuse handshakes whose `Origin` header is not the configured one.
fn check_origin(allowed: Option<&str>, req: &Request) -> Result<(), ErrorResponse> {
    let Some(allowed) = allowed else {
        return Ok(());
    };
    let origin = req
        .headers()
        .get("origin")
        .and_then(|value| value.to_str().ok());
    if origin == Some(allowed) {
        return Ok(());
    }

    warn!(origin = ?origin, "Rejected handshake from disallowed origin");
    let mut response = ErrorResponse::new(Some("origin not allowed".into()));
    *response.status_mut() = StatusCode::FORBIDDEN;
    Err(response)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
