//! Core value objects and the message entity.

use std::fmt;

use uuid::Uuid;

use super::error::DomainError;

/// Maximum length of a username, in characters.
const MAX_USERNAME_LEN: usize = 64;
/// Maximum length of a room name, in characters.
const MAX_ROOM_NAME_LEN: usize = 128;
/// Maximum length of a message body, in characters.
const MAX_BODY_LEN: usize = 4096;

/// Opaque identifier of one live transport session.
///
/// Assigned by the coordinator at connect time; clients never propose their
/// own connection identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh connection identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Coordinator-assigned message identifier.
///
/// Allocated from a monotonically increasing counter under the state lock,
/// so identifiers are unique and totally ordered for the coordinator's
/// lifetime. Client-proposed identifiers are never trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix timestamp in UTC milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Username accepted as an opaque string; identity issuance is external.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyUsername);
        }
        if value.chars().count() > MAX_USERNAME_LEN {
            return Err(DomainError::UsernameTooLong(MAX_USERNAME_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for Username {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Name of an ephemeral room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyRoomName);
        }
        if value.chars().count() > MAX_ROOM_NAME_LEN {
            return Err(DomainError::RoomNameTooLong(MAX_ROOM_NAME_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for RoomName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Text body of a chat message. Optional on the message when an image is
/// attached, but never empty when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::EmptyBody);
        }
        if value.chars().count() > MAX_BODY_LEN {
            return Err(DomainError::BodyTooLong(MAX_BODY_LEN));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque reference into the external image store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::EmptyImageRef);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A message published into a room.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room: RoomName,
    pub author: Username,
    pub body: Option<MessageBody>,
    pub image: Option<ImageRef>,
    pub sent_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rejects_empty_and_whitespace() {
        // given / when / then:
        assert!(Username::new(String::new()).is_err());
        assert!(Username::new("   ".to_string()).is_err());
    }

    #[test]
    fn test_username_rejects_overlong_value() {
        // given:
        let long = "a".repeat(MAX_USERNAME_LEN + 1);

        // when / then:
        assert!(matches!(
            Username::new(long),
            Err(DomainError::UsernameTooLong(_))
        ));
    }

    #[test]
    fn test_room_name_accepts_ordinary_value() {
        // when:
        let room = RoomName::new("general".to_string()).unwrap();

        // then:
        assert_eq!(room.as_str(), "general");
    }

    #[test]
    fn test_message_body_rejects_empty() {
        assert!(matches!(
            MessageBody::new(String::new()),
            Err(DomainError::EmptyBody)
        ));
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // when:
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then:
        assert_ne!(a, b);
    }

    #[test]
    fn test_message_ids_order_by_value() {
        assert!(MessageId::new(1) < MessageId::new(2));
    }
}
