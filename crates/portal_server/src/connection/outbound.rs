//! Outbound text encoding and line-ending framing.

use session_bus::Encoding;

/// A message to write to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Encoded with the session encoding
    Text(String),
    /// Written as is
    Bytes(Vec<u8>),
}

impl Outbound {
    /// Encodes and frames the message for the wire.
    pub fn frame(&self, encoding: Encoding) -> Vec<u8> {
        match self {
            Outbound::Text(text) => frame_outbound(&encoding.encode(text)),
            Outbound::Bytes(bytes) => frame_outbound(bytes),
        }
    }
}

impl From<&str> for Outbound {
    fn from(text: &str) -> Self {
        Outbound::Text(text.to_string())
    }
}

impl From<String> for Outbound {
    fn from(text: String) -> Self {
        Outbound::Text(text)
    }
}

impl From<Vec<u8>> for Outbound {
    fn from(bytes: Vec<u8>) -> Self {
        Outbound::Bytes(bytes)
    }
}

/// Normalizes CRLF and CR to LF, ensures a trailing LF, then turns every LF
/// into CRLF.
pub fn frame_outbound(message: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(message.len() + 2);
    let mut bytes = message.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        match byte {
            b'\r' => {
                bytes.next_if_eq(&b'\n');
                framed.extend_from_slice(b"\r\n");
            }
            b'\n' => framed.extend_from_slice(b"\r\n"),
            byte => framed.push(byte),
        }
    }

    if !framed.ends_with(b"\r\n") {
        framed.extend_from_slice(b"\r\n");
    }
    framed
}
