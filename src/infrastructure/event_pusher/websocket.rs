//! WebSocket-backed `EventPusher` implementation.
//!
//! The UI layer creates one `UnboundedSender` per connection when the
//! WebSocket is accepted; this implementation holds those senders and is the
//! only delivery path for outbound events. WebSocket creation and event
//! delivery stay separated:
//! - UI layer: accepts the connection, spawns the pusher loop
//! - Infrastructure layer: keeps the sender map, pushes events

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPusher, PushError, PusherChannel};

/// WebSocket `EventPusher`: a map of connection id to the connection's
/// outbound channel.
#[derive(Default)]
pub struct WebSocketEventPusher {
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketEventPusher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register(&self, conn_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(conn_id, sender);
        tracing::debug!("connection '{}' registered to event pusher", conn_id);
    }

    async fn unregister(&self, conn_id: ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(&conn_id);
        tracing::debug!("connection '{}' unregistered from event pusher", conn_id);
    }

    async fn push_to(&self, conn_id: ConnectionId, payload: &str) -> Result<(), PushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(&conn_id) {
            sender
                .send(payload.to_string())
                .map_err(|e| PushError::PushFailed(e.to_string()))?;
            tracing::debug!("pushed event to connection '{}'", conn_id);
            Ok(())
        } else {
            Err(PushError::ConnectionNotFound(conn_id))
        }
    }

    async fn broadcast(&self, targets: Vec<ConnectionId>, payload: &str) -> Result<(), PushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // Partial delivery failure is tolerated; the member re-syncs
                // from snapshots on reconnect.
                if let Err(e) = sender.send(payload.to_string()) {
                    tracing::warn!("failed to push event to connection '{}': {}", target, e);
                }
            } else {
                tracing::warn!("connection '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}
