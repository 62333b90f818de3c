use command_args::DefinitionError;
use session_bus::{BusError, SessionId};
use thiserror::Error;

/// Errors raised by the game host.
#[derive(Debug, Error)]
pub enum GameError {
    /// Talking to the portal failed
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
    /// No session record has this id
    #[error("unknown session: {0}")]
    UnknownSession(SessionId),
    /// A session record with this id already exists
    #[error("session already exists: {0}")]
    DuplicateSession(SessionId),
    /// Invalid command arguments
    #[error("invalid command definition: {0}")]
    Definition(#[from] DefinitionError),
    /// A command declares a branch nobody handles
    #[error("command '{command}' has no handler named '{handler}'")]
    MissingHandler { command: String, handler: String },
    /// Two commands claim the same name or alias
    #[error("command name '{0}' is already taken")]
    DuplicateCommand(String),
    /// A command handler failed
    #[error("handler execution error: {0}")]
    Handler(String),
}
