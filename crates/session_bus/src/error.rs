use thiserror::Error;

/// Errors raised by the bus.
#[derive(Debug, Error)]
pub enum BusError {
    /// No peer process is attached to this side of the bus
    #[error("no peer is attached to the bus")]
    Disconnected,
    /// Socket or framing failure
    #[error("bus I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A frame did not hold a valid message
    #[error("bus serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// A message lacks a key its name requires
    #[error("message '{message}' is missing field '{field}'")]
    MissingField { message: String, field: String },
    /// A payload key holds a value of the wrong type
    #[error("message '{message}' has an invalid '{field}' field")]
    InvalidField { message: String, field: String },
    /// A registered handler failed while processing a message
    #[error("handler execution error: {0}")]
    Handler(String),
}
