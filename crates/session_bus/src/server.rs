//! Both ends of the bus connection.

use crate::error::BusError;
use crate::handle::BusHandle;
use crate::handler::HandlerRegistry;
use crate::peer::serve_peer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Listening end, hosted by the portal.
///
/// Only one game process is served at a time: a new connection replaces the
/// current one.
pub struct BusServer {
    handle: BusHandle,
    handlers: Arc<HandlerRegistry>,
}

impl BusServer {
    pub fn new(handle: BusHandle, handlers: HandlerRegistry) -> Self {
        Self {
            handle,
            handlers: Arc::new(handlers),
        }
    }

    /// Binds `address` and serves game connections until `cancel` fires.
    pub async fn run(self, address: SocketAddr, cancel: CancellationToken) -> Result<(), BusError> {
        let listener = TcpListener::bind(address).await?;
        self.serve(listener, cancel).await
    }

    /// Serves game connections on an already bound listener.
    pub async fn serve(self, listener: TcpListener, cancel: CancellationToken) -> Result<(), BusError> {
        info!("📡 Command bus listening on {}", listener.local_addr()?);
        let mut current: Option<CancellationToken> = None;

        loop {
            let (stream, peer_addr) = tokio::select! {
                _ = cancel.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("Failed to accept bus connection: {}", e);
                        continue;
                    }
                },
            };

            if let Some(previous) = current.take() {
                warn!("Game process reconnected from {}, replacing previous peer", peer_addr);
                previous.cancel();
            } else {
                info!("🔗 Game process connected from {}", peer_addr);
            }

            let token = cancel.child_token();
            current = Some(token.clone());
            let _ = stream.set_nodelay(true);

            let handle = self.handle.clone();
            let handlers = self.handlers.clone();
            tokio::spawn(async move {
                match serve_peer(stream, handle, handlers, token).await {
                    Ok(()) => info!("Game process {} disconnected", peer_addr),
                    Err(e) => warn!("Bus connection with {} failed: {}", peer_addr, e),
                }
            });
        }

        info!("Command bus stopped");
        Ok(())
    }
}

/// Connecting end, hosted by the game process.
pub struct BusClient {
    handle: BusHandle,
    handlers: Arc<HandlerRegistry>,
}

impl BusClient {
    pub fn new(handle: BusHandle, handlers: HandlerRegistry) -> Self {
        Self {
            handle,
            handlers: Arc::new(handlers),
        }
    }

    /// Connects to the portal and serves the connection until it closes or
    /// `cancel` fires.
    pub async fn run(self, address: SocketAddr, cancel: CancellationToken) -> Result<(), BusError> {
        let stream = TcpStream::connect(address).await?;
        let _ = stream.set_nodelay(true);
        info!("🔗 Connected to portal bus at {}", address);

        serve_peer(stream, self.handle, self.handlers, cancel).await?;
        info!("Disconnected from portal bus");
        Ok(())
    }
}
