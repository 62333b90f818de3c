//! Core portal server implementation.
//!
//! This module contains the `PortalServer` struct: it binds the cleartext
//! and TLS endpoints, runs their accept loops and spawns one connection task
//! per client.

use super::handlers::{handle_connection, ConnectionContext};
use crate::bus_handlers::register_bus_handlers;
use crate::config::ServerConfig;
use crate::connection::ConnectionManager;
use crate::error::ServerError;
use crate::tls::load_acceptor;
use futures::stream::{FuturesUnordered, StreamExt};
use session_bus::{BusHandle, HandlerRegistry};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Listeners bound by [`PortalServer::bind`].
#[derive(Debug)]
pub struct PortalListeners {
    plain: TcpListener,
    tls: Option<TcpListener>,
}

impl PortalListeners {
    pub fn plain_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.plain.local_addr()?)
    }

    pub fn tls_addr(&self) -> Result<Option<SocketAddr>, ServerError> {
        self.tls
            .as_ref()
            .map(|listener| listener.local_addr().map_err(ServerError::from))
            .transpose()
    }
}

/// The network-facing portal.
///
/// Owns client sockets only: every complete input line goes to the game
/// process over the bus, and the game answers with `write` and
/// `close_session` messages handled by [`PortalServer::bus_handlers`].
pub struct PortalServer {
    config: Arc<ServerConfig>,
    connections: Arc<ConnectionManager>,
    bus: BusHandle,
    tls_acceptor: Option<TlsAcceptor>,
}

/// A TLS endpoint ready to accept: the acceptor and the handshake deadline.
#[derive(Clone)]
struct TlsEndpoint {
    acceptor: TlsAcceptor,
    handshake_timeout: Duration,
}

impl PortalServer {
    /// Creates a portal.
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoints, limits and encoding. TLS is on by default;
    ///   set `config.tls` to `None` to serve cleartext only
    /// * `bus` - Handle used to reach the game process
    ///
    /// # Returns
    ///
    /// The portal, with nothing bound yet. The configuration is validated and
    /// the TLS certificate and key are loaded here, so missing or broken
    /// material stops the process before any socket is opened.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use portal_server::{PortalServer, ServerConfig};
    /// use session_bus::BusHandle;
    ///
    /// let config = ServerConfig {
    ///     tls: None,
    ///     ..ServerConfig::default()
    /// };
    /// let server = PortalServer::new(config, BusHandle::new())?;
    /// # Ok::<(), portal_server::ServerError>(())
    /// ```
    pub fn new(config: ServerConfig, bus: BusHandle) -> Result<Self, ServerError> {
        config.validate()?;
        let tls_acceptor = match &config.tls {
            Some(tls) => Some(load_acceptor(&tls.cert_path, &tls.key_path)?),
            None => None,
        };

        Ok(Self {
            connections: Arc::new(ConnectionManager::new(bus.clone())),
            config: Arc::new(config),
            bus,
            tls_acceptor,
        })
    }

    pub fn connections(&self) -> Arc<ConnectionManager> {
        self.connections.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handlers for the messages the game sends to the portal.
    pub fn bus_handlers(&self) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        register_bus_handlers(&mut registry, self.connections.clone());
        registry
    }

    /// Binds the configured endpoints.
    pub fn bind(&self) -> Result<PortalListeners, ServerError> {
        let plain = bind_listener(self.config.bind_address)?;
        info!("✅ Cleartext listener bound on {}", plain.local_addr()?);

        let tls = match (&self.config.tls, &self.tls_acceptor) {
            (Some(tls), Some(_)) => {
                let listener = bind_listener(tls.bind_address)?;
                info!("🔒 TLS listener bound on {}", listener.local_addr()?);
                Some(listener)
            }
            _ => None,
        };

        Ok(PortalListeners { plain, tls })
    }

    /// Binds and serves until `shutdown` fires.
    pub async fn start(&self, shutdown: CancellationToken) -> Result<(), ServerError> {
        info!("🚀 Starting portal on {}", self.config.bind_address);
        let listeners = self.bind()?;
        self.serve(listeners, shutdown).await
    }

    /// Runs the accept loops on already bound listeners until `shutdown` fires.
    pub async fn serve(
        &self,
        listeners: PortalListeners,
        shutdown: CancellationToken,
    ) -> Result<(), ServerError> {
        let context = ConnectionContext {
            config: self.config.clone(),
            connections: self.connections.clone(),
            bus: self.bus.clone(),
        };

        let mut accept_loops = FuturesUnordered::new();
        accept_loops.push(accept_loop(
            listeners.plain,
            None,
            context.clone(),
            shutdown.clone(),
        ));
        let tls = self.config.tls.as_ref().zip(self.tls_acceptor.clone());
        if let (Some(listener), Some((settings, acceptor))) = (listeners.tls, tls) {
            let endpoint = TlsEndpoint {
                acceptor,
                handshake_timeout: settings.handshake_timeout,
            };
            accept_loops.push(accept_loop(
                listener,
                Some(endpoint),
                context.clone(),
                shutdown.clone(),
            ));
        }

        while accept_loops.next().await.is_some() {}

        info!(
            "🧹 Portal stopped with {} session(s) still registered",
            self.connections.session_count().await
        );
        Ok(())
    }
}

async fn accept_loop(
    listener: TcpListener,
    tls: Option<TlsEndpoint>,
    context: ConnectionContext,
    shutdown: CancellationToken,
) {
    loop {
        let accepted = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };

        let (stream, remote_addr) = match accepted {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        let _ = stream.set_nodelay(true);

        let context = context.clone();
        let shutdown = shutdown.clone();
        match tls.clone() {
            None => {
                tokio::spawn(handle_connection(stream, remote_addr, false, context, shutdown));
            }
            Some(endpoint) => {
                tokio::spawn(async move {
                    let handshake = tokio::select! {
                        _ = shutdown.cancelled() => return,
                        handshake = tokio::time::timeout(
                            endpoint.handshake_timeout,
                            endpoint.acceptor.accept(stream),
                        ) => handshake,
                    };
                    match handshake {
                        Ok(Ok(stream)) => {
                            handle_connection(stream, remote_addr, true, context, shutdown).await
                        }
                        Ok(Err(e)) => warn!("TLS handshake with {} failed: {}", remote_addr, e),
                        Err(_) => warn!(
                            "TLS handshake with {} timed out after {:?}",
                            remote_addr, endpoint.handshake_timeout
                        ),
                    }
                });
            }
        }
    }
}

fn bind_listener(address: SocketAddr) -> Result<TcpListener, ServerError> {
    let domain = if address.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))
        .map_err(|e| ServerError::Network(format!("Socket creation failed: {e}")))?;
    socket.set_reuse_address(true).ok();

    socket
        .bind(&address.into())
        .map_err(|e| ServerError::Network(format!("Bind to {address} failed: {e}")))?;
    socket
        .listen(1024)
        .map_err(|e| ServerError::Network(format!("Listen failed: {e}")))?;

    let std_listener: StdTcpListener = socket.into();
    std_listener
        .set_nonblocking(true)
        .map_err(|e| ServerError::Network(format!("Failed to set non-blocking: {e}")))?;

    TcpListener::from_std(std_listener)
        .map_err(|e| ServerError::Network(format!("Tokio listener creation failed: {e}")))
}
