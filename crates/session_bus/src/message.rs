//! Bus messages and their payloads.
//!
//! A message is a name and a small keyed payload. The names the core relies
//! on are listed as constants below; any other name can be sent and handled
//! by the application.

use crate::encoding::Encoding;
use crate::error::BusError;
use crate::types::SessionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Portal → game: a client connected.
pub const NEW_SESSION: &str = "new_session";
/// Portal → game: a client went away.
pub const DISCONNECT_SESSION: &str = "disconnect_session";
/// Portal → game: one complete line of client input.
pub const INPUT: &str = "input";
/// Game → portal: text to send to a client.
pub const WRITE: &str = "write";
/// Game → portal: close a client connection.
pub const CLOSE_SESSION: &str = "close_session";

/// A primitive payload value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayloadValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Bytes(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl From<&str> for PayloadValue {
    fn from(text: &str) -> Self {
        PayloadValue::Text(text.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(text: String) -> Self {
        PayloadValue::Text(text)
    }
}

impl From<i64> for PayloadValue {
    fn from(number: i64) -> Self {
        PayloadValue::Int(number)
    }
}

impl From<bool> for PayloadValue {
    fn from(flag: bool) -> Self {
        PayloadValue::Bool(flag)
    }
}

impl From<Vec<u8>> for PayloadValue {
    fn from(bytes: Vec<u8>) -> Self {
        PayloadValue::Bytes(bytes)
    }
}

impl From<&[u8]> for PayloadValue {
    fn from(bytes: &[u8]) -> Self {
        PayloadValue::Bytes(bytes.to_vec())
    }
}

mod base64_bytes {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

/// A named message travelling over the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusMessage {
    pub name: String,
    #[serde(default)]
    pub payload: BTreeMap<String, PayloadValue>,
}

impl BusMessage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: BTreeMap::new(),
        }
    }

    /// Adds a payload entry, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Announces a connection. `encoding` is the one the client's input is
    /// to be decoded with.
    pub fn new_session(
        session_id: SessionId,
        ip_address: &str,
        secured: bool,
        creation: i64,
        encoding: Encoding,
    ) -> Self {
        Self::new(NEW_SESSION)
            .with("session_id", session_id.to_string())
            .with("ip_address", ip_address)
            .with("secured", secured)
            .with("creation", creation)
            .with("encoding", encoding.name())
    }

    pub fn disconnect_session(session_id: SessionId) -> Self {
        Self::new(DISCONNECT_SESSION).with("session_id", session_id.to_string())
    }

    /// Raw line bytes, undecoded.
    pub fn input(session_id: SessionId, command: impl Into<Vec<u8>>) -> Self {
        Self::new(INPUT)
            .with("session_id", session_id.to_string())
            .with("command", PayloadValue::Bytes(command.into()))
    }

    pub fn write(session_id: SessionId, message: impl Into<PayloadValue>) -> Self {
        Self::new(WRITE)
            .with("session_id", session_id.to_string())
            .with("message", message)
    }

    pub fn close_session(session_id: SessionId) -> Self {
        Self::new(CLOSE_SESSION).with("session_id", session_id.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.payload.get(key)
    }

    fn require(&self, key: &str) -> Result<&PayloadValue, BusError> {
        self.payload.get(key).ok_or_else(|| BusError::MissingField {
            message: self.name.clone(),
            field: key.to_string(),
        })
    }

    fn invalid(&self, key: &str) -> BusError {
        BusError::InvalidField {
            message: self.name.clone(),
            field: key.to_string(),
        }
    }

    pub fn text(&self, key: &str) -> Result<&str, BusError> {
        match self.require(key)? {
            PayloadValue::Text(text) => Ok(text),
            _ => Err(self.invalid(key)),
        }
    }

    pub fn int(&self, key: &str) -> Result<i64, BusError> {
        match self.require(key)? {
            PayloadValue::Int(number) => Ok(*number),
            _ => Err(self.invalid(key)),
        }
    }

    pub fn flag(&self, key: &str) -> Result<bool, BusError> {
        match self.require(key)? {
            PayloadValue::Bool(flag) => Ok(*flag),
            _ => Err(self.invalid(key)),
        }
    }

    /// Binary content of `key`. Text values are returned as their UTF-8 bytes.
    pub fn bytes(&self, key: &str) -> Result<&[u8], BusError> {
        match self.require(key)? {
            PayloadValue::Bytes(bytes) => Ok(bytes),
            PayloadValue::Text(text) => Ok(text.as_bytes()),
            _ => Err(self.invalid(key)),
        }
    }

    /// The `encoding` key, parsed. A message without one means UTF-8.
    pub fn encoding(&self) -> Result<Encoding, BusError> {
        match self.payload.get("encoding") {
            None => Ok(Encoding::default()),
            Some(PayloadValue::Text(name)) => name.parse().map_err(|_| self.invalid("encoding")),
            Some(_) => Err(self.invalid("encoding")),
        }
    }

    /// The `session_id` key, parsed.
    pub fn session_id(&self) -> Result<SessionId, BusError> {
        self.text("session_id")?
            .parse()
            .map_err(|_| self.invalid("session_id"))
    }
}
