//! Table of live connections.

use super::outbound::Outbound;
use super::session::SessionInfo;
use crate::error::ServerError;
use session_bus::{BusHandle, BusMessage, SessionId};
use std::collections::HashMap;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What the table keeps for each live connection.
#[derive(Debug)]
struct SessionHandle {
    info: SessionInfo,
    outbound: mpsc::Sender<Vec<u8>>,
    reader: CancellationToken,
}

/// Tracks live connections and owns their teardown.
///
/// Removing a session from the table is the single point that decides who
/// tears it down, so `disconnect_session` reaches the bus at most once per
/// session however many failures race.
#[derive(Debug)]
pub struct ConnectionManager {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    bus: BusHandle,
}

impl ConnectionManager {
    pub fn new(bus: BusHandle) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            bus,
        }
    }

    /// Adds a connection. `outbound` feeds its writer task and `reader`
    /// stops its read loop. The capacity of `outbound` bounds how many
    /// frames may wait for the writer.
    pub async fn register(
        &self,
        info: SessionInfo,
        outbound: mpsc::Sender<Vec<u8>>,
        reader: CancellationToken,
    ) {
        let id = info.id;
        self.sessions.write().await.insert(
            id,
            SessionHandle {
                info,
                outbound,
                reader,
            },
        );
        debug!("Registered session {}", id);
    }

    /// Removes a session without notifying the game. Returns whether it was
    /// still registered.
    pub async fn forget(&self, id: SessionId) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Removes a session, stops its read loop and tells the game it is gone.
    ///
    /// # Arguments
    ///
    /// * `id` - The session to close
    /// * `reason` - Why it is closed, for the log
    ///
    /// # Returns
    ///
    /// `true` when this call closed the session, `false` when it was already
    /// gone. Only the first call for a given session has any effect, so
    /// `disconnect_session` reaches the bus at most once.
    ///
    /// # Example
    ///
    /// ```
    /// use portal_server::ConnectionManager;
    /// use session_bus::{BusHandle, SessionId};
    ///
    /// # async fn example() {
    /// let manager = ConnectionManager::new(BusHandle::new());
    /// assert!(!manager.teardown(SessionId::new(), "read error").await);
    /// # }
    /// ```
    pub async fn teardown(&self, id: SessionId, reason: &str) -> bool {
        let Some(handle) = self.sessions.write().await.remove(&id) else {
            return false;
        };

        handle.reader.cancel();
        // Dropping the sender lets the writer flush what is queued, then close.
        drop(handle.outbound);
        info!("👋 Session {} from {} closed: {}", id, handle.info.remote_addr, reason);

        self.bus.notify(BusMessage::disconnect_session(id)).await;
        true
    }

    /// Explicit close requested by the game.
    pub async fn close(&self, id: SessionId) -> bool {
        self.teardown(id, "closed by the game").await
    }

    /// Frames `message` with the session encoding and queues it.
    ///
    /// Never waits for the writer: a full queue means the client stopped
    /// reading, and the session is torn down with a `write backlog` reason.
    pub async fn write_to(&self, id: SessionId, message: impl Into<Outbound>) -> Result<(), ServerError> {
        let message = message.into();
        let queued = {
            let sessions = self.sessions.read().await;
            let handle = sessions.get(&id).ok_or(ServerError::SessionNotFound(id))?;
            handle.outbound.try_send(message.frame(handle.info.encoding))
        };

        match queued {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!("Session {} is not reading its output", id);
                self.teardown(id, "write backlog").await;
                Err(ServerError::WriteBacklog(id))
            }
            Err(TrySendError::Closed(_)) => {
                self.teardown(id, "writer stopped").await;
                Err(ServerError::SessionNotFound(id))
            }
        }
    }

    pub async fn session_info(&self, id: SessionId) -> Option<SessionInfo> {
        self.sessions.read().await.get(&id).map(|handle| handle.info.clone())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }
}
