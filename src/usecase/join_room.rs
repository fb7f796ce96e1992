//! Room join: binds a connection and brings it up to date.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    ConnectionId, EventPusher, MessageStore, RegistryError, RoomName, SharedState, Timestamp,
    Username,
};
use crate::infrastructure::dto::websocket::{
    ActiveRoomDto, MessageDto, RoomMemberDto, ServerEvent,
};

use super::error::JoinRoomError;

/// How many stored messages seed a joining client.
pub const HISTORY_LIMIT: usize = 50;

/// Handles the one-time join of a connection into a room.
///
/// Under the state lock: bind the connection, add it to the room (creating
/// the room and its receipt namespace on first member), mark the user
/// online. After release: seed history to the joiner, notify the others,
/// snapshot membership to the room, snapshot the directory to everyone.
pub struct JoinRoomUseCase {
    state: SharedState,
    pusher: Arc<dyn EventPusher>,
    store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
    pub fn new(
        state: SharedState,
        pusher: Arc<dyn EventPusher>,
        store: Arc<dyn MessageStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            pusher,
            store,
            clock,
        }
    }

    pub async fn execute(
        &self,
        conn_id: ConnectionId,
        username: Username,
        room: RoomName,
    ) -> Result<(), JoinRoomError> {
        let now = Timestamp::new(self.clock.now_millis());

        let (others, room_conns, members, count, active, everyone) = {
            let mut state = self.state.lock().await;

            if let Err(e) = state.registry.bind(conn_id, username.clone(), room.clone()) {
                return Err(match e {
                    RegistryError::AlreadyBound(_) => JoinRoomError::AlreadyJoined {
                        current: state
                            .registry
                            .lookup(conn_id)
                            .map(|b| b.room.as_str().to_string())
                            .unwrap_or_default(),
                    },
                    RegistryError::NotRegistered(_) => JoinRoomError::ConnectionGone,
                });
            }

            let created = state.rooms.join(room.clone(), conn_id, username.clone());
            if created {
                state.receipts.init_room(room.clone());
            }
            state.presence.mark_online(&username, now);

            (
                state.rooms.fanout_targets(&room, conn_id),
                state.rooms.member_conns(&room),
                state.room_members(&room),
                state.rooms.member_count(&room),
                state.active_rooms(),
                state.registry.all_ids(),
            )
        };

        // Store outage degrades to an empty history; the join still succeeds.
        let history = match self.store.recent(&room, HISTORY_LIMIT).await {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!(
                    "message store unavailable, seeding empty history for room '{}': {}",
                    room,
                    e
                );
                Vec::new()
            }
        };
        let history_event = ServerEvent::MessageHistory {
            room: room.as_str().to_string(),
            messages: history.iter().map(MessageDto::from).collect(),
        };
        if let Err(e) = self.pusher.push_to(conn_id, &history_event.to_json()).await {
            tracing::warn!("failed to seed history to connection '{}': {}", conn_id, e);
        }

        let notice = ServerEvent::JoinedSystemNotice {
            room: room.as_str().to_string(),
            text: format!("{} joined the room", username),
        };
        if let Err(e) = self.pusher.broadcast(others, &notice.to_json()).await {
            tracing::warn!("failed to broadcast join notice: {}", e);
        }

        let snapshot = ServerEvent::RoomMembersSnapshot {
            room: room.as_str().to_string(),
            members: members.iter().map(RoomMemberDto::from).collect(),
            count,
        };
        if let Err(e) = self.pusher.broadcast(room_conns, &snapshot.to_json()).await {
            tracing::warn!("failed to broadcast member snapshot: {}", e);
        }

        let directory = ServerEvent::ActiveRoomsSnapshot {
            rooms: active.iter().map(ActiveRoomDto::from).collect(),
        };
        if let Err(e) = self.pusher.broadcast(everyone, &directory.to_json()).await {
            tracing::warn!("failed to broadcast active rooms: {}", e);
        }

        tracing::info!(
            "'{}' joined room '{}' on connection '{}'",
            username,
            room,
            conn_id
        );
        Ok(())
    }
}
