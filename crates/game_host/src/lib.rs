//! # Game Host
//!
//! The game-process half of the server. It receives sessions and their raw
//! input lines from the portal over the [`session_bus`], keeps a record per
//! session in a [`SessionStore`], and runs commands parsed with
//! [`command_args`].
//!
//! An input line is handled in three steps:
//!
//! 1. the first word is looked up in the [`CommandTable`] (name or alias,
//!    case-insensitive); an unknown word answers "Unknown command."
//! 2. the rest of the line is parsed by the command's arguments; a parse
//!    error is written back to the player as is
//! 3. the namespace's handler tag selects the [`CommandHandler`] to run
//!
//! ```no_run
//! use game_host::{register_builtins, CommandTable, GameHost, MemorySessionStore};
//! use session_bus::BusHandle;
//! use std::sync::Arc;
//!
//! # fn build() -> Result<(), game_host::GameError> {
//! let mut table = CommandTable::new();
//! register_builtins(&mut table)?;
//! let host = Arc::new(GameHost::new(table, Arc::new(MemorySessionStore::new()), BusHandle::new()));
//! let handlers = host.bus_handlers();
//! # let _ = handlers;
//! # Ok(())
//! # }
//! ```

pub mod builtins;
pub mod command;
pub mod error;
pub mod host;
pub mod store;

pub use builtins::{help_command, quit_command, register_builtins, Help, Quit};
pub use command::{Command, CommandContext, CommandHandler, CommandTable};
pub use error::GameError;
pub use host::{GameHost, DEFAULT_WELCOME, UNKNOWN_COMMAND};
pub use store::{MemorySessionStore, SessionRecord, SessionStore};
