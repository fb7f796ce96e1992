//! Message publish: id allocation, fanout, and confirmation.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    ChatMessage, ConnectionId, EventPusher, ImageRef, LastMessage, MessageBody, MessageStore,
    SharedState, Timestamp,
};
use crate::infrastructure::dto::websocket::{ActiveRoomDto, MessageDto, ServerEvent};

use super::error::SendMessageError;

/// Handles a message publish from a joined connection.
///
/// Under the state lock: allocate the message id, seed the read-receipt set
/// with the author, overwrite the room's last-message cache, refresh the
/// author's presence. After release: append to the store, deliver to the
/// other members, confirm to the author, refresh the directory for everyone.
pub struct SendMessageUseCase {
    state: SharedState,
    pusher: Arc<dyn EventPusher>,
    store: Arc<dyn MessageStore>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
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
        body: Option<MessageBody>,
        image: Option<ImageRef>,
    ) -> Result<ChatMessage, SendMessageError> {
        if body.is_none() && image.is_none() {
            return Err(SendMessageError::EmptyMessage);
        }

        let now = Timestamp::new(self.clock.now_millis());

        let (message, targets, active, everyone) = {
            let mut state = self.state.lock().await;

            let Some(binding) = state.registry.lookup(conn_id).cloned() else {
                return Err(if state.registry.is_registered(conn_id) {
                    SendMessageError::NotJoined
                } else {
                    SendMessageError::ConnectionGone
                });
            };

            let id = state.allocate_message_id();
            let message = ChatMessage {
                id,
                room: binding.room.clone(),
                author: binding.username.clone(),
                body,
                image,
                sent_at: now,
            };

            state
                .receipts
                .seed(&binding.room, id, binding.username.clone());
            state.rooms.set_last_message(
                &binding.room,
                LastMessage {
                    message: message.clone(),
                    arrived_at: now,
                },
            );
            state.presence.touch(&binding.username, now);

            (
                message,
                state.rooms.fanout_targets(&binding.room, conn_id),
                state.active_rooms(),
                state.registry.all_ids(),
            )
        };

        // The store is advisory: an append failure never blocks delivery.
        if let Err(e) = self.store.append(&message.room, &message).await {
            tracing::warn!(
                "failed to append message {} to store: {}",
                message.id,
                e
            );
        }

        let delivered = ServerEvent::MessageDelivered {
            message: MessageDto::from(&message),
        };
        if let Err(e) = self.pusher.broadcast(targets, &delivered.to_json()).await {
            tracing::warn!("failed to deliver message {}: {}", message.id, e);
        }

        let confirmation = ServerEvent::SendConfirmation {
            message_id: message.id.value(),
        };
        if let Err(e) = self.pusher.push_to(conn_id, &confirmation.to_json()).await {
            tracing::warn!(
                "failed to confirm message {} to connection '{}': {}",
                message.id,
                conn_id,
                e
            );
        }

        let directory = ServerEvent::ActiveRoomsSnapshot {
            rooms: active.iter().map(ActiveRoomDto::from).collect(),
        };
        if let Err(e) = self.pusher.broadcast(everyone, &directory.to_json()).await {
            tracing::warn!("failed to broadcast active rooms: {}", e);
        }

        tracing::debug!(
            "message {} published into room '{}' by '{}'",
            message.id,
            message.room,
            message.author
        );
        Ok(message)
    }
}
