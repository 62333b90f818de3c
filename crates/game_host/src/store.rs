//! Session records kept by the game process.

use crate::error::GameError;
use async_trait::async_trait;
use dashmap::DashMap;
use session_bus::{Encoding, SessionId};

/// What the game knows about a connected client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub id: SessionId,
    pub ip_address: String,
    pub secured: bool,
    /// Connection time, seconds since the Unix epoch
    pub creation: i64,
    /// Encoding used to decode the client's input
    pub encoding: Encoding,
    /// Logged-in account, if any
    pub account: Option<String>,
    /// Played character, if any
    pub character: Option<String>,
}

impl SessionRecord {
    pub fn new(id: SessionId, creation: i64, ip_address: impl Into<String>, secured: bool) -> Self {
        Self {
            id,
            ip_address: ip_address.into(),
            secured,
            creation,
            encoding: Encoding::Utf8,
            account: None,
            character: None,
        }
    }

    /// Sets the encoding of the client's input.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Storage of session records.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates the record of a new session.
    async fn create(&self, record: SessionRecord) -> Result<(), GameError>;

    async fn get(&self, id: SessionId) -> Option<SessionRecord>;

    /// Unbinds the account and character of a session.
    async fn logout(&self, id: SessionId) -> Result<(), GameError>;

    /// Deletes a record. Returns whether it existed.
    async fn delete(&self, id: SessionId) -> Result<bool, GameError>;

    async fn count(&self) -> usize;
}

/// In-memory [`SessionStore`].
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: DashMap<SessionId, SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds an account and character to a session.
    pub fn login(
        &self,
        id: SessionId,
        account: impl Into<String>,
        character: impl Into<String>,
    ) -> Result<(), GameError> {
        let mut record = self
            .records
            .get_mut(&id)
            .ok_or(GameError::UnknownSession(id))?;
        record.account = Some(account.into());
        record.character = Some(character.into());
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, record: SessionRecord) -> Result<(), GameError> {
        use dashmap::mapref::entry::Entry;

        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(GameError::DuplicateSession(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn get(&self, id: SessionId) -> Option<SessionRecord> {
        self.records.get(&id).map(|record| record.clone())
    }

    async fn logout(&self, id: SessionId) -> Result<(), GameError> {
        let mut record = self
            .records
            .get_mut(&id)
            .ok_or(GameError::UnknownSession(id))?;
        record.account = None;
        record.character = None;
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<bool, GameError> {
        Ok(self.records.remove(&id).is_some())
    }

    async fn count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.create(SessionRecord::new(id, 10, "127.0.0.1", false)).await.unwrap();

        assert!(matches!(
            store.create(SessionRecord::new(id, 11, "127.0.0.1", false)).await,
            Err(GameError::DuplicateSession(_))
        ));
        assert_eq!(store.get(id).await.unwrap().creation, 10);

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_logout_unbinds_character() {
        let store = MemorySessionStore::new();
        let id = SessionId::new();
        store.create(SessionRecord::new(id, 0, "::1", true)).await.unwrap();
        store.login(id, "admin", "Kredh").unwrap();

        store.logout(id).await.unwrap();
        let record = store.get(id).await.unwrap();
        assert_eq!(record.account, None);
        assert_eq!(record.character, None);
    }

    #[test]
    fn test_record_defaults_to_utf8() {
        let record = SessionRecord::new(SessionId::new(), 0, "::1", false);
        assert_eq!(record.encoding, Encoding::Utf8);

        let record = record.with_encoding(Encoding::Latin1);
        assert_eq!(record.encoding, Encoding::Latin1);
    }
}
