//! In-memory `MessageStore` implementation.
//!
//! Stands in for the external durable log so the coordinator's collaborator
//! contract is exercised end to end. Not a durability claim: contents vanish
//! with the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageStore, RoomName, StoreError};

/// In-memory append-only log, keyed by room.
#[derive(Default)]
pub struct InMemoryMessageStore {
    rooms: Mutex<HashMap<RoomName, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, room: &RoomName, message: &ChatMessage) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        rooms.entry(room.clone()).or_default().push(message.clone());
        Ok(())
    }

    async fn recent(&self, room: &RoomName, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let rooms = self.rooms.lock().await;
        let messages = rooms.get(room).map(Vec::as_slice).unwrap_or_default();
        let start = messages.len().saturating_sub(limit);
        Ok(messages[start..].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, MessageId, Timestamp, Username};

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    fn message(id: u64, body: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId::new(id),
            room: room("general"),
            author: Username::new("alice".to_string()).unwrap(),
            body: Some(MessageBody::new(body.to_string()).unwrap()),
            image: None,
            sent_at: Timestamp::new(1000),
        }
    }

    #[tokio::test]
    async fn test_recent_returns_appended_messages_oldest_first() {
        // given:
        let store = InMemoryMessageStore::new();
        store.append(&room("general"), &message(1, "first")).await.unwrap();
        store.append(&room("general"), &message(2, "second")).await.unwrap();

        // when:
        let recent = store.recent(&room("general"), 50).await.unwrap();

        // then:
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, MessageId::new(1));
        assert_eq!(recent[1].id, MessageId::new(2));
    }

    #[tokio::test]
    async fn test_recent_honors_limit_keeping_newest() {
        // given:
        let store = InMemoryMessageStore::new();
        for i in 1..=5 {
            store.append(&room("general"), &message(i, "msg")).await.unwrap();
        }

        // when:
        let recent = store.recent(&room("general"), 2).await.unwrap();

        // then:
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, MessageId::new(4));
        assert_eq!(recent[1].id, MessageId::new(5));
    }

    #[tokio::test]
    async fn test_recent_unknown_room_is_empty() {
        let store = InMemoryMessageStore::new();
        let recent = store.recent(&room("ghost"), 50).await.unwrap();
        assert!(recent.is_empty());
    }
}
