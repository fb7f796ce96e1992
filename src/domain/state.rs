//! The coordinator's single-authority state aggregate.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::model::{ConnectionId, MessageId, RoomName, Timestamp, Username};
use super::presence::PresenceTable;
use super::receipts::ReadReceiptTracker;
use super::registry::ConnectionRegistry;
use super::rooms::{LastMessage, RoomDirectory};

/// One member row of a room snapshot: the username with its shared presence.
#[derive(Debug, Clone)]
pub struct RoomMember {
    pub username: Username,
    pub online: bool,
    pub last_active: Timestamp,
}

/// One row of the active-room directory.
#[derive(Debug, Clone)]
pub struct ActiveRoom {
    pub room: RoomName,
    pub member_count: usize,
    pub last_message: Option<LastMessage>,
    pub last_activity: Option<Timestamp>,
}

/// All coordinator state behind one mutation point.
///
/// Every event handler locks the surrounding mutex, applies its compound
/// update to completion, computes the outbound plan, and only then releases
/// the lock. No collaborator I/O happens while the lock is held.
#[derive(Debug, Default)]
pub struct CoordinatorState {
    pub registry: ConnectionRegistry,
    pub rooms: RoomDirectory,
    pub presence: PresenceTable,
    pub receipts: ReadReceiptTracker,
    next_message_id: u64,
}

/// The shared handle the session use cases operate on.
pub type SharedState = Arc<Mutex<CoordinatorState>>;

impl CoordinatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedState {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Allocate the next message identifier. Monotonic for the coordinator's
    /// lifetime; allocation happens under the state lock, so concurrent
    /// publishes always observe distinct, totally-ordered ids.
    pub fn allocate_message_id(&mut self) -> MessageId {
        self.next_message_id += 1;
        MessageId::new(self.next_message_id)
    }

    /// Presence-joined member snapshot for a room, one row per distinct
    /// username, sorted by username.
    pub fn room_members(&self, room: &RoomName) -> Vec<RoomMember> {
        let mut by_username: BTreeMap<Username, RoomMember> = BTreeMap::new();
        for username in self.rooms.member_usernames(room) {
            let presence = self.presence.get(&username);
            by_username.entry(username.clone()).or_insert(RoomMember {
                online: presence.is_some_and(|p| p.online),
                last_active: presence.map_or(Timestamp::new(0), |p| p.last_active),
                username,
            });
        }
        by_username.into_values().collect()
    }

    /// Recompute the active-room directory: every non-empty room with its
    /// member count and last-message summary. Empty rooms cannot appear
    /// because the room directory deletes them on their last leave.
    pub fn active_rooms(&self) -> Vec<ActiveRoom> {
        let mut rooms: Vec<ActiveRoom> = self
            .rooms
            .room_names()
            .into_iter()
            .map(|room| {
                let last_message = self.rooms.last_message(&room).cloned();
                let last_activity = last_message.as_ref().map(|l| l.arrived_at);
                ActiveRoom {
                    member_count: self.rooms.member_count(&room),
                    last_message,
                    last_activity,
                    room,
                }
            })
            .collect();
        // Stable output order for clients; presentation-layer sorting beyond
        // this is a collaborator concern.
        rooms.sort_by(|a, b| a.room.cmp(&b.room));
        rooms
    }
}
