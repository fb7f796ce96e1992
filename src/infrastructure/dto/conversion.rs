//! Domain model → DTO conversions.

use crate::domain::{ActiveRoom, ChatMessage, RoomMember};

use super::websocket::{ActiveRoomDto, MessageDto, RoomMemberDto};

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.value(),
            room: message.room.as_str().to_string(),
            author: message.author.as_str().to_string(),
            body: message.body.as_ref().map(|b| b.as_str().to_string()),
            image_ref: message.image.as_ref().map(|i| i.as_str().to_string()),
            sent_at: message.sent_at.value(),
        }
    }
}

impl From<&RoomMember> for RoomMemberDto {
    fn from(member: &RoomMember) -> Self {
        Self {
            username: member.username.as_str().to_string(),
            online: member.online,
            last_active: member.last_active.value(),
        }
    }
}

impl From<&ActiveRoom> for ActiveRoomDto {
    fn from(active: &ActiveRoom) -> Self {
        Self {
            room: active.room.as_str().to_string(),
            member_count: active.member_count,
            last_message: active.last_message.as_ref().map(|l| (&l.message).into()),
            last_activity: active.last_activity.map(|t| t.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageBody, MessageId, RoomName, Timestamp, Username};

    #[test]
    fn test_chat_message_converts_to_dto() {
        // given:
        let message = ChatMessage {
            id: MessageId::new(5),
            room: RoomName::new("general".to_string()).unwrap(),
            author: Username::new("alice".to_string()).unwrap(),
            body: Some(MessageBody::new("hello".to_string()).unwrap()),
            image: None,
            sent_at: Timestamp::new(1234),
        };

        // when:
        let dto = MessageDto::from(&message);

        // then:
        assert_eq!(dto.id, 5);
        assert_eq!(dto.room, "general");
        assert_eq!(dto.author, "alice");
        assert_eq!(dto.body.as_deref(), Some("hello"));
        assert!(dto.image_ref.is_none());
        assert_eq!(dto.sent_at, 1234);
    }
}
