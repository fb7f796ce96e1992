//! Read acknowledgment: receipt-set updates and room-wide notification.

use std::sync::Arc;

use crate::domain::{ConnectionId, EventPusher, MessageId, SharedState};
use crate::infrastructure::dto::websocket::ServerEvent;

/// Records that the acting user has read a message.
///
/// Only a first-time addition triggers a broadcast; repeated and out-of-room
/// acknowledgments are absorbed silently. Nothing here can fail from the
/// client's point of view.
pub struct AcknowledgeReadUseCase {
    state: SharedState,
    pusher: Arc<dyn EventPusher>,
}

impl AcknowledgeReadUseCase {
    pub fn new(state: SharedState, pusher: Arc<dyn EventPusher>) -> Self {
        Self { state, pusher }
    }

    pub async fn execute(&self, conn_id: ConnectionId, message_id: MessageId) {
        let (targets, read_by) = {
            let mut state = self.state.lock().await;

            // Acknowledgments from unbound connections are absorbed.
            let Some(binding) = state.registry.lookup(conn_id).cloned() else {
                return;
            };

            let outcome = state
                .receipts
                .acknowledge(&binding.room, message_id, binding.username);
            if !outcome.newly_added {
                return;
            }

            (state.rooms.member_conns(&binding.room), outcome.read_by)
        };

        let update = ServerEvent::ReadReceiptUpdate {
            message_id: message_id.value(),
            read_by: read_by.iter().map(|u| u.as_str().to_string()).collect(),
        };
        if let Err(e) = self.pusher.broadcast(targets, &update.to_json()).await {
            tracing::warn!(
                "failed to broadcast read receipt for message {}: {}",
                message_id,
                e
            );
        }
    }
}
