//! Per-connection state.

use super::framer::LineFramer;
use session_bus::Encoding;
use session_bus::SessionId;
use std::net::SocketAddr;
use std::time::SystemTime;

/// Immutable facts about a connection, shared with the connection table.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: SessionId,
    pub remote_addr: SocketAddr,
    pub secured: bool,
    pub encoding: Encoding,
    pub connected_at: SystemTime,
}

/// Raised when a client sends more than the allowed bytes without a line
/// terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTooLong {
    pub pending: usize,
    pub limit: usize,
}

/// One client connection as seen by its read loop.
///
/// The session owns its [`LineFramer`]; the socket halves are owned by the
/// read loop and the writer task respectively.
#[derive(Debug)]
pub struct ConnectionSession {
    info: SessionInfo,
    framer: LineFramer,
    max_line_length: usize,
}

impl ConnectionSession {
    pub fn new(
        remote_addr: SocketAddr,
        secured: bool,
        encoding: Encoding,
        max_line_length: usize,
    ) -> Self {
        Self {
            info: SessionInfo {
                id: SessionId::new(),
                remote_addr,
                secured,
                encoding,
                connected_at: SystemTime::now(),
            },
            framer: LineFramer::new(),
            max_line_length,
        }
    }

    pub fn id(&self) -> SessionId {
        self.info.id
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Feeds a chunk and returns the lines it completed.
    pub fn receive(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.framer.feed(chunk);
        self.framer.lines().collect()
    }

    /// Fails when the unterminated tail is longer than the line limit.
    pub fn check_pending(&self) -> Result<(), LineTooLong> {
        let pending = self.framer.pending_len();
        if pending > self.max_line_length {
            return Err(LineTooLong {
                pending,
                limit: self.max_line_length,
            });
        }
        Ok(())
    }
}
