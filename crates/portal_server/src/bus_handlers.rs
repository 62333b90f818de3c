//! Handlers for the messages the game sends to the portal.

use crate::connection::{ConnectionManager, Outbound};
use crate::error::ServerError;
use async_trait::async_trait;
use session_bus::{BusError, BusMessage, HandlerRegistry, MessageHandler, PayloadValue, CLOSE_SESSION, WRITE};
use std::sync::Arc;
use tracing::debug;

/// `write {session_id, message}`: frames and sends text to a client.
pub struct WriteHandler {
    connections: Arc<ConnectionManager>,
}

#[async_trait]
impl MessageHandler for WriteHandler {
    async fn handle(&self, message: BusMessage) -> Result<(), BusError> {
        let id = message.session_id()?;
        let outbound = match message.get("message") {
            Some(PayloadValue::Text(text)) => Outbound::Text(text.clone()),
            Some(PayloadValue::Bytes(bytes)) => Outbound::Bytes(bytes.clone()),
            Some(_) => {
                return Err(BusError::InvalidField {
                    message: message.name.clone(),
                    field: "message".into(),
                })
            }
            None => {
                return Err(BusError::MissingField {
                    message: message.name.clone(),
                    field: "message".into(),
                })
            }
        };

        match self.connections.write_to(id, outbound).await {
            Err(ServerError::SessionNotFound(_)) => {
                debug!("Dropped write to closed session {}", id);
                Ok(())
            }
            Err(ServerError::WriteBacklog(_)) => {
                debug!("Dropped write to backlogged session {}", id);
                Ok(())
            }
            Err(e) => Err(BusError::Handler(e.to_string())),
            Ok(()) => Ok(()),
        }
    }
}

/// `close_session {session_id}`: disconnects a client.
pub struct CloseSessionHandler {
    connections: Arc<ConnectionManager>,
}

#[async_trait]
impl MessageHandler for CloseSessionHandler {
    async fn handle(&self, message: BusMessage) -> Result<(), BusError> {
        let id = message.session_id()?;
        if !self.connections.close(id).await {
            debug!("Close requested for unknown session {}", id);
        }
        Ok(())
    }
}

pub fn register_bus_handlers(registry: &mut HandlerRegistry, connections: Arc<ConnectionManager>) {
    registry
        .on(
            WRITE,
            WriteHandler {
                connections: connections.clone(),
            },
        )
        .on(CLOSE_SESSION, CloseSessionHandler { connections });
}
