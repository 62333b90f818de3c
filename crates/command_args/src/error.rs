//! Error types for argument definition and parsing.
//!
//! Two very different failure families live here. [`ArgumentError`] is an
//! expected, user-facing outcome of parsing a line and is returned as data.
//! [`DefinitionError`] means a command was declared incorrectly and is
//! raised while the command table is being built, never at parse time.

use thiserror::Error;

/// A located parse failure.
///
/// The position is a byte offset into the parsed line, pointing at the place
/// where the mismatch was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ArgumentError {
    message: String,
    position: usize,
}

impl ArgumentError {
    /// Creates a new error with a message and the offending byte offset.
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// The corrective message to show to the user.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset in the input where the mismatch was detected.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Keeps whichever of `best` and `candidate` got further into the input.
    /// On a tie the error already kept wins.
    pub(crate) fn keep_deepest(best: &mut Option<ArgumentError>, candidate: ArgumentError) {
        let deeper = best
            .as_ref()
            .map_or(true, |kept| candidate.position > kept.position);
        if deeper {
            *best = Some(candidate);
        }
    }
}

/// Errors raised while declaring arguments and branches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// No argument kind is registered under this name
    #[error("invalid argument type: {0:?}")]
    UnknownKind(String),
    /// The argument kind needs a parameter (a keyword, a symbol string...)
    #[error("argument type {kind:?} requires a non-empty parameter")]
    MissingParameter { kind: &'static str },
    /// The destination of an in-namespace argument is empty
    #[error("argument of type {kind:?} has an empty destination")]
    EmptyDestination { kind: &'static str },
    /// A branch was declared without a handler name
    #[error("branch handler name cannot be empty")]
    EmptyHandler,
    /// A group role other than `|` or `+`
    #[error("invalid group role: {0:?}")]
    UnknownGroupRole(String),
    /// A group was added to a branch without any alternative
    #[error("argument group has no alternative")]
    EmptyGroup,
}
