use session_bus::SessionId;
use thiserror::Error;

/// Errors raised by the portal.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Binding or accepting failed
    #[error("Network error: {0}")]
    Network(String),
    /// Certificate or key material could not be loaded
    #[error("TLS error: {0}")]
    Tls(String),
    /// Invalid server configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// No live session has this id
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
    /// The session's outbound queue was full; the session has been closed
    #[error("Write backlog on session {0}")]
    WriteBacklog(SessionId),
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
