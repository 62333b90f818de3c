//! The game side of the session bus.

use crate::command::{CommandContext, CommandTable};
use crate::error::GameError;
use crate::store::{SessionRecord, SessionStore};
use async_trait::async_trait;
use command_args::helpers::{skip_whitespace, word_end};
use session_bus::{
    BusError, BusHandle, BusMessage, HandlerRegistry, MessageHandler, DISCONNECT_SESSION, INPUT,
    NEW_SESSION,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const UNKNOWN_COMMAND: &str = "Unknown command.";
pub const DEFAULT_WELCOME: &str = "Welcome!";

/// Receives sessions and their input from the portal and runs commands.
pub struct GameHost {
    table: Arc<CommandTable>,
    store: Arc<dyn SessionStore>,
    bus: BusHandle,
    welcome: String,
}

impl GameHost {
    pub fn new(table: CommandTable, store: Arc<dyn SessionStore>, bus: BusHandle) -> Self {
        Self {
            table: Arc::new(table),
            store,
            bus,
            welcome: DEFAULT_WELCOME.to_string(),
        }
    }

    /// Text written to every new session.
    pub fn with_welcome(mut self, welcome: impl Into<String>) -> Self {
        self.welcome = welcome.into();
        self
    }

    pub fn table(&self) -> &Arc<CommandTable> {
        &self.table
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    /// Bus handlers for the messages the portal sends.
    ///
    /// # Returns
    ///
    /// A registry handling `new_session` (create the record, send the
    /// welcome), `input` (decode with the session encoding, look the command
    /// up, parse, run) and `disconnect_session` (logout, delete). Hand it to
    /// a `BusClient`; every client built for a reconnect gets a fresh one.
    ///
    /// # Example
    ///
    /// ```
    /// use game_host::{register_builtins, CommandTable, GameHost, MemorySessionStore};
    /// use session_bus::{BusHandle, NEW_SESSION};
    /// use std::sync::Arc;
    ///
    /// let mut table = CommandTable::new();
    /// register_builtins(&mut table).unwrap();
    /// let host = Arc::new(GameHost::new(
    ///     table,
    ///     Arc::new(MemorySessionStore::new()),
    ///     BusHandle::new(),
    /// ));
    ///
    /// let handlers = host.bus_handlers();
    /// assert!(handlers.handles(NEW_SESSION));
    /// ```
    pub fn bus_handlers(self: &Arc<Self>) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry
            .on(NEW_SESSION, NewSessionHandler { host: self.clone() })
            .on(INPUT, InputHandler { host: self.clone() })
            .on(DISCONNECT_SESSION, DisconnectHandler { host: self.clone() });
        registry
    }

    pub async fn open_session(&self, record: SessionRecord) -> Result<(), GameError> {
        let id = record.id;
        info!("🎮 Session {} opened from {}", id, record.ip_address);
        self.store.create(record).await?;
        self.bus.send(BusMessage::write(id, self.welcome.clone())).await?;
        Ok(())
    }

    /// Runs one line of input from a session.
    pub async fn execute(&self, record: &SessionRecord, line: &str) -> Result<(), GameError> {
        let start = skip_whitespace(line, 0, line.len());
        if start == line.len() {
            return Ok(());
        }
        let word_stop = word_end(line, start, line.len());
        let word = &line[start..word_stop];

        let ctx = CommandContext {
            session_id: record.id,
            bus: self.bus.clone(),
            store: self.store.clone(),
            table: self.table.clone(),
        };

        let Some(command) = self.table.find(word) else {
            debug!("Session {} sent unknown command '{}'", record.id, word);
            return ctx.msg(UNKNOWN_COMMAND).await;
        };

        let namespace = match command.args().parse_span(line, word_stop, line.len()) {
            Ok(namespace) => namespace,
            Err(error) => return ctx.msg(error.message()).await,
        };

        match command.handler_for(&namespace) {
            Some(handler) => handler.run(&ctx, &namespace).await,
            None => Err(GameError::MissingHandler {
                command: command.name().to_string(),
                handler: namespace.handler().unwrap_or_default().to_string(),
            }),
        }
    }

    pub async fn close_session(&self, id: session_bus::SessionId) -> Result<(), GameError> {
        match self.store.logout(id).await {
            Ok(()) | Err(GameError::UnknownSession(_)) => {}
            Err(e) => return Err(e),
        }
        if self.store.delete(id).await? {
            info!("👋 Session {} closed", id);
        } else {
            debug!("Disconnect for unknown session {}", id);
        }
        Ok(())
    }
}

fn into_bus_error(error: GameError) -> BusError {
    match error {
        GameError::Bus(e) => e,
        other => BusError::Handler(other.to_string()),
    }
}

/// `new_session {session_id, ip_address, secured, creation, encoding}`
struct NewSessionHandler {
    host: Arc<GameHost>,
}

#[async_trait]
impl MessageHandler for NewSessionHandler {
    async fn handle(&self, message: BusMessage) -> Result<(), BusError> {
        let record = SessionRecord::new(
            message.session_id()?,
            message.int("creation")?,
            message.text("ip_address")?,
            message.flag("secured")?,
        )
        .with_encoding(message.encoding()?);
        self.host.open_session(record).await.map_err(into_bus_error)
    }
}

/// `input {session_id, command}`
struct InputHandler {
    host: Arc<GameHost>,
}

#[async_trait]
impl MessageHandler for InputHandler {
    async fn handle(&self, message: BusMessage) -> Result<(), BusError> {
        let id = message.session_id()?;
        let Some(record) = self.host.store.get(id).await else {
            warn!("Dropping input for unknown session {}", id);
            return Ok(());
        };

        let line = record.encoding.decode(message.bytes("command")?);
        self.host.execute(&record, &line).await.map_err(into_bus_error)
    }
}

/// `disconnect_session {session_id}`
struct DisconnectHandler {
    host: Arc<GameHost>,
}

#[async_trait]
impl MessageHandler for DisconnectHandler {
    async fn handle(&self, message: BusMessage) -> Result<(), BusError> {
        let id = message.session_id()?;
        self.host.close_session(id).await.map_err(into_bus_error)
    }
}
