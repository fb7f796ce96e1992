//! Connection establishment.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPusher, PusherChannel, SharedState};
use crate::infrastructure::dto::websocket::{ActiveRoomDto, ServerEvent};

/// Registers a fresh connection and seeds it with the current active-room
/// directory, so clients can render a room list before joining anything.
pub struct ConnectUseCase {
    state: SharedState,
    pusher: Arc<dyn EventPusher>,
}

impl ConnectUseCase {
    pub fn new(state: SharedState, pusher: Arc<dyn EventPusher>) -> Self {
        Self { state, pusher }
    }

    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let conn_id = ConnectionId::generate();

        let active = {
            let mut state = self.state.lock().await;
            state.registry.register(conn_id);
            state.active_rooms()
        };

        self.pusher.register(conn_id, sender).await;

        let snapshot = ServerEvent::ActiveRoomsSnapshot {
            rooms: active.iter().map(ActiveRoomDto::from).collect(),
        };
        if let Err(e) = self.pusher.push_to(conn_id, &snapshot.to_json()).await {
            tracing::warn!(
                "failed to seed active rooms to connection '{}': {}",
                conn_id,
                e
            );
        }

        tracing::info!("connection '{}' established", conn_id);
        conn_id
    }
}
