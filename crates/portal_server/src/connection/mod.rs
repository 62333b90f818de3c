//! Client connections: line framing, per-session state and the connection
//! table.

pub mod framer;
pub mod manager;
pub mod outbound;
pub mod session;

pub use framer::LineFramer;
pub use manager::ConnectionManager;
pub use outbound::{frame_outbound, Outbound};
pub use session_bus::Encoding;
pub use session::{ConnectionSession, LineTooLong, SessionInfo};
