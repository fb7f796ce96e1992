//! Room directory: membership per room plus the last-message cache.

use std::collections::HashMap;

use super::model::{ChatMessage, ConnectionId, RoomName, Timestamp, Username};

/// The most recently fanned-out message of a room, plus its arrival time at
/// the coordinator. Overwritten on every publish, never appended.
#[derive(Debug, Clone)]
pub struct LastMessage {
    pub message: ChatMessage,
    pub arrived_at: Timestamp,
}

#[derive(Debug, Default)]
struct RoomEntry {
    members: HashMap<ConnectionId, Username>,
    last_message: Option<LastMessage>,
}

/// Maps room names to their member connections.
///
/// Invariant: a room name exists in the directory iff it has at least one
/// member. `leave` removes the room entry the instant membership reaches
/// zero, which also drops the last-message cache with it.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<RoomName, RoomEntry>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room, creating the room entry if absent.
    /// Returns `true` when the room was created by this join.
    pub fn join(&mut self, room: RoomName, conn_id: ConnectionId, username: Username) -> bool {
        let created = !self.rooms.contains_key(&room);
        self.rooms
            .entry(room)
            .or_default()
            .members
            .insert(conn_id, username);
        created
    }

    /// Remove a connection from a room. Returns the remaining member count,
    /// or `None` if the room or membership was unknown. A room whose count
    /// reaches zero is deleted in the same call.
    pub fn leave(&mut self, room: &RoomName, conn_id: ConnectionId) -> Option<usize> {
        let entry = self.rooms.get_mut(room)?;
        entry.members.remove(&conn_id)?;
        let remaining = entry.members.len();
        if remaining == 0 {
            self.rooms.remove(room);
        }
        Some(remaining)
    }

    pub fn room_exists(&self, room: &RoomName) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn member_count(&self, room: &RoomName) -> usize {
        self.rooms.get(room).map_or(0, |e| e.members.len())
    }

    /// All member connections of a room, the author's own included.
    pub fn member_conns(&self, room: &RoomName) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|e| e.members.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Member usernames of a room, duplicates preserved per connection.
    pub fn member_usernames(&self, room: &RoomName) -> Vec<Username> {
        self.rooms
            .get(room)
            .map(|e| e.members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// The single authoritative fanout path: every member connection of the
    /// room except the excluded one, each at most once.
    pub fn fanout_targets(&self, room: &RoomName, exclude: ConnectionId) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|e| {
                e.members
                    .keys()
                    .copied()
                    .filter(|id| *id != exclude)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Overwrite the room's last-message cache. Returns `false` when the
    /// room is unknown.
    pub fn set_last_message(&mut self, room: &RoomName, last: LastMessage) -> bool {
        match self.rooms.get_mut(room) {
            Some(entry) => {
                entry.last_message = Some(last);
                true
            }
            None => false,
        }
    }

    pub fn last_message(&self, room: &RoomName) -> Option<&LastMessage> {
        self.rooms.get(room).and_then(|e| e.last_message.as_ref())
    }

    pub fn room_names(&self) -> Vec<RoomName> {
        self.rooms.keys().cloned().collect()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
