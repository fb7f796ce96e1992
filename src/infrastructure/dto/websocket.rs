//! WebSocket wire protocol.
//!
//! Events are JSON objects tagged by a `type` field. Inbound events never
//! carry identifiers the coordinator owns (connection ids, message ids for
//! new messages); those are assigned server-side.

use serde::{Deserialize, Serialize};

/// Events a client sends to the coordinator.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Bind this connection to a username and room. Valid once per
    /// connection lifetime.
    JoinRoom {
        username: String,
        room: String,
    },
    /// Publish a message into the bound room. `body` may be omitted when an
    /// image reference is attached.
    #[serde(rename_all = "camelCase")]
    SendMessage {
        #[serde(default)]
        body: Option<String>,
        #[serde(default)]
        image_ref: Option<String>,
    },
    /// Acknowledge that this user has read a message.
    #[serde(rename_all = "camelCase")]
    AcknowledgeRead {
        message_id: u64,
    },
    /// Refresh presence without any broadcast.
    ActivityPing,
    /// Request the bound room's membership snapshot.
    GetRoomMembers,
    /// Request the active-room directory.
    GetActiveRooms,
}

/// A delivered or stored message on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: u64,
    pub room: String,
    pub author: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
    pub sent_at: i64,
}

/// One member row of a room snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomMemberDto {
    pub username: String,
    pub online: bool,
    pub last_active: i64,
}

/// One row of the active-room directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRoomDto {
    pub room: String,
    pub member_count: usize,
    #[serde(default)]
    pub last_message: Option<MessageDto>,
    #[serde(default)]
    pub last_activity: Option<i64>,
}

/// Events the coordinator pushes to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// System notice to a room's other members that someone joined.
    JoinedSystemNotice {
        room: String,
        text: String,
    },
    /// System notice to a room's remaining members that someone left.
    LeftSystemNotice {
        room: String,
        text: String,
    },
    /// Full membership snapshot of a room.
    RoomMembersSnapshot {
        room: String,
        members: Vec<RoomMemberDto>,
        count: usize,
    },
    /// Recent history seeded to a joining client, oldest first.
    MessageHistory {
        room: String,
        messages: Vec<MessageDto>,
    },
    /// A published message, delivered to every other room member.
    MessageDelivered {
        #[serde(flatten)]
        message: MessageDto,
    },
    /// Publish confirmation, sent to the author only.
    #[serde(rename_all = "camelCase")]
    SendConfirmation {
        message_id: u64,
    },
    /// The full updated reader set of a message, sent to the whole room.
    #[serde(rename_all = "camelCase")]
    ReadReceiptUpdate {
        message_id: u64,
        read_by: Vec<String>,
    },
    /// The active-room directory, broadcast to all connections.
    ActiveRoomsSnapshot {
        rooms: Vec<ActiveRoomDto>,
    },
    /// Targeted failure notice to the originating connection only.
    SendFailed {
        reason: String,
    },
}

impl ServerEvent {
    /// Serialize for the wire. The DTO types contain nothing that can fail
    /// to serialize, so this is infallible in practice.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!("failed to serialize server event: {}", e);
            String::from("{\"type\":\"send_failed\",\"reason\":\"internal error\"}")
        })
    }
}
