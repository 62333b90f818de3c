//! Per-connection read loop and writer task.

use crate::config::ServerConfig;
use crate::connection::{ConnectionManager, ConnectionSession};
use session_bus::{current_timestamp, BusHandle, BusMessage, SessionId};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shared state every connection task needs.
#[derive(Debug, Clone)]
pub struct ConnectionContext {
    pub config: Arc<ServerConfig>,
    pub connections: Arc<ConnectionManager>,
    pub bus: BusHandle,
}

/// Drives one client connection until it closes.
///
/// The session is registered and announced with `new_session` before the
/// first read, so the game always learns about a session before any of its
/// input. When `shutdown` fires the loop stops without touching the socket
/// again and without notifying the game.
pub async fn handle_connection<S>(
    stream: S,
    remote_addr: SocketAddr,
    secured: bool,
    context: ConnectionContext,
    shutdown: CancellationToken,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let config = &context.config;
    let mut session = ConnectionSession::new(
        remote_addr,
        secured,
        config.encoding,
        config.max_line_length,
    );
    let id = session.id();
    let (mut reader, writer) = tokio::io::split(stream);
    let (outbound, queue) = mpsc::channel(config.outbound_queue_limit);
    let closing = shutdown.child_token();

    context
        .connections
        .register(session.info().clone(), outbound, closing.clone())
        .await;
    context
        .bus
        .notify(BusMessage::new_session(
            id,
            &remote_addr.ip().to_string(),
            secured,
            current_timestamp(),
            session.info().encoding,
        ))
        .await;
    info!(
        "🔗 New {} session {} from {}",
        if secured { "TLS" } else { "cleartext" },
        id,
        remote_addr
    );

    tokio::spawn(write_loop(
        writer,
        queue,
        id,
        context.connections.clone(),
        shutdown.clone(),
    ));

    let mut chunk = vec![0u8; config.read_chunk_size];
    loop {
        let read = tokio::select! {
            _ = closing.cancelled() => break,
            read = reader.read(&mut chunk) => read,
        };

        let received = match read {
            Ok(0) => {
                context.connections.teardown(id, "connection closed by client").await;
                break;
            }
            Ok(received) => received,
            Err(e) => {
                context.connections.teardown(id, &format!("read error: {e}")).await;
                break;
            }
        };

        for line in session.receive(&chunk[..received]) {
            context.bus.notify(BusMessage::input(id, line)).await;
        }

        if let Err(overflow) = session.check_pending() {
            warn!(
                "Session {} sent {} bytes without a line break (limit {})",
                id, overflow.pending, overflow.limit
            );
            context.connections.teardown(id, "line too long").await;
            break;
        }
    }

    if context.connections.forget(id).await {
        debug!("Session {} dropped on shutdown", id);
    }
}

/// Writes queued frames to the socket, one at a time.
async fn write_loop<W>(
    mut writer: W,
    mut queue: mpsc::Receiver<Vec<u8>>,
    id: SessionId,
    connections: Arc<ConnectionManager>,
    shutdown: CancellationToken,
) where
    W: AsyncWrite + Unpin,
{
    loop {
        let frame = tokio::select! {
            _ = shutdown.cancelled() => return,
            frame = queue.recv() => frame,
        };

        let Some(frame) = frame else {
            let _ = writer.shutdown().await;
            return;
        };

        let written = match writer.write_all(&frame).await {
            Ok(()) => writer.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            connections.teardown(id, &format!("write error: {e}")).await;
            return;
        }
    }
}
