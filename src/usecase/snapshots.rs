//! On-demand snapshot queries.
//!
//! Both queries serve two callers: the WebSocket dispatcher pushes the
//! result to the requesting connection, and the HTTP handlers read the raw
//! snapshot directly.

use std::sync::Arc;

use crate::domain::{ActiveRoom, ConnectionId, EventPusher, RoomMember, RoomName, SharedState};
use crate::infrastructure::dto::websocket::{ActiveRoomDto, RoomMemberDto, ServerEvent};

use super::error::RoomMembersError;

/// Serves the active-room directory.
pub struct GetActiveRoomsUseCase {
    state: SharedState,
    pusher: Arc<dyn EventPusher>,
}

impl GetActiveRoomsUseCase {
    pub fn new(state: SharedState, pusher: Arc<dyn EventPusher>) -> Self {
        Self { state, pusher }
    }

    /// Current directory, recomputed from membership state.
    pub async fn snapshot(&self) -> Vec<ActiveRoom> {
        self.state.lock().await.active_rooms()
    }

    /// Push the directory to the requesting connection.
    pub async fn execute(&self, conn_id: ConnectionId) {
        let active = self.snapshot().await;
        let event = ServerEvent::ActiveRoomsSnapshot {
            rooms: active.iter().map(ActiveRoomDto::from).collect(),
        };
        if let Err(e) = self.pusher.push_to(conn_id, &event.to_json()).await {
            tracing::warn!(
                "failed to push active rooms to connection '{}': {}",
                conn_id,
                e
            );
        }
    }
}

/// Serves a room's membership snapshot.
pub struct GetRoomMembersUseCase {
    state: SharedState,
    pusher: Arc<dyn EventPusher>,
}

impl GetRoomMembersUseCase {
    pub fn new(state: SharedState, pusher: Arc<dyn EventPusher>) -> Self {
        Self { state, pusher }
    }

    /// Membership of a named room, or `None` when the room does not exist.
    pub async fn members_of(&self, room: &RoomName) -> Option<(Vec<RoomMember>, usize)> {
        let state = self.state.lock().await;
        if !state.rooms.room_exists(room) {
            return None;
        }
        Some((state.room_members(room), state.rooms.member_count(room)))
    }

    /// Push the bound room's membership to the requesting connection.
    pub async fn execute(&self, conn_id: ConnectionId) -> Result<(), RoomMembersError> {
        let (room, members, count) = {
            let state = self.state.lock().await;
            let binding = state
                .registry
                .lookup(conn_id)
                .ok_or(RoomMembersError::NotJoined)?;
            let room = binding.room.clone();
            let members = state.room_members(&room);
            let count = state.rooms.member_count(&room);
            (room, members, count)
        };

        let event = ServerEvent::RoomMembersSnapshot {
            room: room.as_str().to_string(),
            members: members.iter().map(RoomMemberDto::from).collect(),
            count,
        };
        if let Err(e) = self.pusher.push_to(conn_id, &event.to_json()).await {
            tracing::warn!(
                "failed to push room members to connection '{}': {}",
                conn_id,
                e
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CoordinatorState, Timestamp, Username};
    use crate::infrastructure::event_pusher::WebSocketEventPusher;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn user(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    fn room(name: &str) -> RoomName {
        RoomName::new(name.to_string()).unwrap()
    }

    async fn next_event(rx: &mut UnboundedReceiver<String>) -> ServerEvent {
        serde_json::from_str(&rx.recv().await.unwrap()).unwrap()
    }

    async fn join(
        state: &SharedState,
        pusher: &Arc<WebSocketEventPusher>,
        username: &str,
        room_name: &str,
    ) -> (ConnectionId, UnboundedReceiver<String>) {
        let conn = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        {
            let mut s = state.lock().await;
            s.registry.register(conn);
            s.registry
                .bind(conn, user(username), room(room_name))
                .unwrap();
            s.rooms.join(room(room_name), conn, user(username));
            s.presence.mark_online(&user(username), Timestamp::new(100));
        }
        pusher.register(conn, tx).await;
        (conn, rx)
    }

    #[tokio::test]
    async fn test_active_rooms_pushed_to_requester_only() {
        // given: alice in a room, carol merely connected
        let state = CoordinatorState::shared();
        let pusher = Arc::new(WebSocketEventPusher::new());
        let (_alice, mut alice_rx) = join(&state, &pusher, "alice", "general").await;
        let carol = ConnectionId::generate();
        let (carol_tx, mut carol_rx) = mpsc::unbounded_channel();
        state.lock().await.registry.register(carol);
        pusher.register(carol, carol_tx).await;
        let usecase = GetActiveRoomsUseCase::new(state, pusher);

        // when:
        usecase.execute(carol).await;

        // then:
        match next_event(&mut carol_rx).await {
            ServerEvent::ActiveRoomsSnapshot { rooms } => {
                assert_eq!(rooms.len(), 1);
                assert_eq!(rooms[0].room, "general");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(alice_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_room_members_pushed_for_bound_room() {
        // given:
        let state = CoordinatorState::shared();
        let pusher = Arc::new(WebSocketEventPusher::new());
        let (_alice, _alice_rx) = join(&state, &pusher, "alice", "general").await;
        let (bob, mut bob_rx) = join(&state, &pusher, "bob", "general").await;
        let usecase = GetRoomMembersUseCase::new(state, pusher);

        // when:
        usecase.execute(bob).await.unwrap();

        // then: sorted usernames with presence
        match next_event(&mut bob_rx).await {
            ServerEvent::RoomMembersSnapshot {
                room,
                members,
                count,
            } => {
                assert_eq!(room, "general");
                assert_eq!(count, 2);
                let names: Vec<_> = members.iter().map(|m| m.username.as_str()).collect();
                assert_eq!(names, vec!["alice", "bob"]);
                assert!(members.iter().all(|m| m.online));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_room_members_requires_a_binding() {
        // given: a connection that never joined
        let state = CoordinatorState::shared();
        let pusher = Arc::new(WebSocketEventPusher::new());
        let conn = ConnectionId::generate();
        state.lock().await.registry.register(conn);
        let usecase = GetRoomMembersUseCase::new(state, pusher);

        // when:
        let result = usecase.execute(conn).await;

        // then:
        assert_eq!(result, Err(RoomMembersError::NotJoined));
    }

    #[tokio::test]
    async fn test_members_of_unknown_room_is_none() {
        // given:
        let state = CoordinatorState::shared();
        let pusher = Arc::new(WebSocketEventPusher::new());
        let usecase = GetRoomMembersUseCase::new(state, pusher);

        // when / then:
        assert!(usecase.members_of(&room("ghost")).await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_reads_do_not_mutate_state() {
        // given:
        let state = CoordinatorState::shared();
        let pusher = Arc::new(WebSocketEventPusher::new());
        let (_alice, _alice_rx) = join(&state, &pusher, "alice", "general").await;
        let usecase = GetActiveRoomsUseCase::new(state.clone(), pusher);

        // when:
        let first = usecase.snapshot().await;
        let second = usecase.snapshot().await;

        // then:
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(state.lock().await.rooms.room_count(), 1);
    }
}
