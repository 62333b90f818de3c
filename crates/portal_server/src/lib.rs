//! # Portal Server
//!
//! The network-facing half of the game: accepts line-oriented text clients
//! over cleartext TCP and TLS, and relays them to the game process over the
//! [`session_bus`].
//!
//! ## Architecture
//!
//! * **Accept loops** - one per endpoint, driven together until shutdown
//! * **Connection tasks** - one read loop and one writer task per client
//! * **Line framing** - [`LineFramer`] buffers partial reads, normalizes CR
//!   and CRLF and hands out complete lines
//! * **Outbound framing** - every write is encoded with the session encoding
//!   and terminated with CRLF
//! * **Connection table** - [`ConnectionManager`] tracks live sessions and
//!   guarantees a single `disconnect_session` per session
//!
//! ## Session lifecycle
//!
//! 1. A client connects; a [`SessionId`](session_bus::SessionId) is generated
//!    and `new_session` is sent to the game
//! 2. Every complete line is sent as `input`, raw and undecoded
//! 3. The game answers with `write`; `close_session` disconnects the client
//! 4. On EOF, read or write error, overlong line, write backlog or explicit
//!    close the session is removed and `disconnect_session` is sent once
//!
//! Bus messages are sent with [`BusHandle::notify`](session_bus::BusHandle::notify),
//! so the portal keeps serving clients while the game process is down.
//!
//! ## TLS
//!
//! The default configuration serves TLS on `0.0.0.0:4001` with
//! `.ssl/telnet.cert` and `.ssl/telnet.key`. Missing or unreadable material
//! fails [`PortalServer::new`]; a cleartext-only portal sets
//! [`ServerConfig::tls`] to `None`.
//!
//! ## Example
//!
//! ```no_run
//! use portal_server::{PortalServer, ServerConfig};
//! use session_bus::BusHandle;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), portal_server::ServerError> {
//! let server = PortalServer::new(ServerConfig::default(), BusHandle::new())?;
//! server.start(CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod bus_handlers;
pub mod config;
pub mod connection;
pub mod error;
pub mod server;
pub mod tls;

pub use config::{ServerConfig, TlsSettings};
pub use connection::{
    frame_outbound, ConnectionManager, ConnectionSession, Encoding, LineFramer, Outbound,
    SessionInfo,
};
pub use error::ServerError;
pub use server::{PortalListeners, PortalServer};
