//! Connection teardown: one compound state update, then notifications.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    ActiveRoom, Binding, ConnectionId, EventPusher, RoomMember, SharedState, Timestamp,
};
use crate::infrastructure::dto::websocket::{ActiveRoomDto, RoomMemberDto, ServerEvent};

struct DeparturePlan {
    binding: Binding,
    remaining_conns: Vec<ConnectionId>,
    members: Vec<RoomMember>,
    count: usize,
    active: Vec<ActiveRoom>,
    everyone: Vec<ConnectionId>,
}

/// Handles a terminated connection.
///
/// Registry removal, room departure, presence offline, and receipt-namespace
/// cleanup happen in one pass under the state lock, so no observer sees a
/// half-departed member or a zero-member room. Disconnects of anonymous or
/// unknown connections clean up silently.
pub struct DisconnectUseCase {
    state: SharedState,
    pusher: Arc<dyn EventPusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectUseCase {
    pub fn new(state: SharedState, pusher: Arc<dyn EventPusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state,
            pusher,
            clock,
        }
    }

    pub async fn execute(&self, conn_id: ConnectionId) {
        let now = Timestamp::new(self.clock.now_millis());

        let plan = {
            let mut state = self.state.lock().await;
            match state.registry.unbind(conn_id) {
                None => None,
                Some(binding) => {
                    state.presence.mark_offline(&binding.username, now);
                    let remaining = state.rooms.leave(&binding.room, conn_id);
                    if remaining == Some(0) {
                        state.receipts.drop_room(&binding.room);
                    }
                    Some(DeparturePlan {
                        remaining_conns: state.rooms.member_conns(&binding.room),
                        members: state.room_members(&binding.room),
                        count: state.rooms.member_count(&binding.room),
                        active: state.active_rooms(),
                        everyone: state.registry.all_ids(),
                        binding,
                    })
                }
            }
        };

        self.pusher.unregister(conn_id).await;

        let Some(plan) = plan else {
            tracing::debug!("connection '{}' closed before joining a room", conn_id);
            return;
        };

        if !plan.remaining_conns.is_empty() {
            let notice = ServerEvent::LeftSystemNotice {
                room: plan.binding.room.as_str().to_string(),
                text: format!("{} left the room", plan.binding.username),
            };
            if let Err(e) = self
                .pusher
                .broadcast(plan.remaining_conns.clone(), &notice.to_json())
                .await
            {
                tracing::warn!("failed to broadcast leave notice: {}", e);
            }

            let snapshot = ServerEvent::RoomMembersSnapshot {
                room: plan.binding.room.as_str().to_string(),
                members: plan.members.iter().map(RoomMemberDto::from).collect(),
                count: plan.count,
            };
            if let Err(e) = self
                .pusher
                .broadcast(plan.remaining_conns, &snapshot.to_json())
                .await
            {
                tracing::warn!("failed to broadcast member snapshot: {}", e);
            }
        }

        let directory = ServerEvent::ActiveRoomsSnapshot {
            rooms: plan.active.iter().map(ActiveRoomDto::from).collect(),
        };
        if let Err(e) = self
            .pusher
            .broadcast(plan.everyone, &directory.to_json())
            .await
        {
            tracing::warn!("failed to broadcast active rooms: {}", e);
        }

        tracing::info!(
            "'{}' left room '{}' on connection '{}'",
            plan.binding.username,
            plan.binding.room,
            conn_id
        );
    }
}
