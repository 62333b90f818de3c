//! Portal server: listeners, accept loops and connection tasks.

pub mod core;
pub mod handlers;

pub use self::core::{PortalListeners, PortalServer};
pub use self::handlers::{handle_connection, ConnectionContext};
