//! # Session Bus
//!
//! The command bus joining the portal process, which owns client sockets,
//! to the game process, which owns game logic. It is a single long-lived TCP
//! connection on localhost carrying named messages, each framed as a
//! length-prefixed JSON document.
//!
//! ## Messages
//!
//! | name                 | direction     | payload                                          |
//! |----------------------|---------------|--------------------------------------------------|
//! | `new_session`        | portal → game | `session_id`, `ip_address`, `secured`, `creation`, `encoding` |
//! | `input`              | portal → game | `session_id`, `command` (bytes)                  |
//! | `disconnect_session` | portal → game | `session_id`                                     |
//! | `write`              | game → portal | `session_id`, `message` (text or bytes)          |
//! | `close_session`      | game → portal | `session_id`                                     |
//!
//! Applications may send any other name; the receiver logs and skips names
//! it has no handler for.
//!
//! ## Sending
//!
//! Both processes hold a [`BusHandle`]. [`BusHandle::send`] fails fast with
//! [`BusError::Disconnected`] when no peer is attached, and
//! [`BusHandle::notify`] silently drops the message instead.

pub mod codec;
pub mod encoding;
pub mod error;
pub mod handle;
pub mod handler;
pub mod message;
pub mod peer;
pub mod server;
pub mod types;

pub use codec::BusCodec;
pub use encoding::Encoding;
pub use error::BusError;
pub use handle::BusHandle;
pub use handler::{FnHandler, HandlerRegistry, MessageHandler};
pub use message::{
    BusMessage, PayloadValue, CLOSE_SESSION, DISCONNECT_SESSION, INPUT, NEW_SESSION, WRITE,
};
pub use peer::serve_peer;
pub use server::{BusClient, BusServer};
pub use types::{current_timestamp, SessionId};
