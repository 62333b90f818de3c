//! The sending side of the bus.

use crate::error::BusError;
use crate::message::BusMessage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::debug;

struct Peer {
    generation: u64,
    outbound: mpsc::UnboundedSender<BusMessage>,
}

/// Cloneable handle used to send messages to the attached peer process.
///
/// Messages are queued on the connection's writer task, so sending never
/// waits for the remote side. All clones share the same peer, and messages
/// sent through any clone keep their relative order.
#[derive(Clone, Default)]
pub struct BusHandle {
    peer: Arc<RwLock<Option<Peer>>>,
    generations: Arc<AtomicU64>,
}

impl std::fmt::Debug for BusHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusHandle")
            .field("generations", &self.generations.load(Ordering::Relaxed))
            .finish()
    }
}

impl BusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a peer connection, replacing any previous one.
    ///
    /// Returns the generation to pass back to [`detach`](Self::detach).
    pub async fn attach(&self, outbound: mpsc::UnboundedSender<BusMessage>) -> u64 {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        *self.peer.write().await = Some(Peer {
            generation,
            outbound,
        });
        generation
    }

    /// Detaches the peer, unless a newer connection has replaced it.
    pub async fn detach(&self, generation: u64) {
        let mut peer = self.peer.write().await;
        if peer.as_ref().is_some_and(|p| p.generation == generation) {
            *peer = None;
        }
    }

    pub async fn is_attached(&self) -> bool {
        self.peer
            .read()
            .await
            .as_ref()
            .is_some_and(|p| !p.outbound.is_closed())
    }

    /// Queues a message for the peer.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to deliver, in order with earlier ones
    ///
    /// # Returns
    ///
    /// `Ok(())` once the message is queued for the peer's writer, or
    /// [`BusError::Disconnected`] right away when no peer is attached. Never
    /// waits for the peer to come back.
    ///
    /// # Example
    ///
    /// ```
    /// use session_bus::{BusError, BusHandle, BusMessage, SessionId};
    ///
    /// # async fn example() {
    /// let bus = BusHandle::new();
    /// let result = bus.send(BusMessage::close_session(SessionId::new())).await;
    /// assert!(matches!(result, Err(BusError::Disconnected)));
    /// # }
    /// ```
    pub async fn send(&self, message: BusMessage) -> Result<(), BusError> {
        let peer = self.peer.read().await;
        let Some(peer) = peer.as_ref() else {
            return Err(BusError::Disconnected);
        };
        peer.outbound
            .send(message)
            .map_err(|_| BusError::Disconnected)
    }

    /// Like [`send`](Self::send), but silently drops the message when no peer
    /// is attached.
    pub async fn notify(&self, message: BusMessage) {
        let name = message.name.clone();
        if self.send(message).await.is_err() {
            debug!("No bus peer attached, dropped '{}'", name);
        }
    }
}
