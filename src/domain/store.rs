//! Durable message store interface.
//!
//! The coordinator writes to and reads from an external append-only log but
//! does not implement durability itself. Unavailability must degrade
//! gracefully: joins proceed with empty history, publishes proceed with a
//! logged append failure.

use async_trait::async_trait;
use thiserror::Error;

use super::model::{ChatMessage, RoomName};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("message store is unavailable: {0}")]
    Unavailable(String),
}

/// Append-only message store collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append a published message to the room's log.
    async fn append(&self, room: &RoomName, message: &ChatMessage) -> Result<(), StoreError>;

    /// The most recent messages of a room, oldest first, at most `limit`.
    /// Used to seed a joining client's history.
    async fn recent(&self, room: &RoomName, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;
}
