//! Outbound event delivery interface.
//!
//! The domain defines the interface it needs for pushing serialized events
//! to connections; the infrastructure layer provides the WebSocket-backed
//! implementation (dependency inversion).

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::model::ConnectionId;

/// Channel used to hand a serialized event to a connection's pusher loop.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("connection {0} is not reachable")]
    ConnectionNotFound(ConnectionId),

    #[error("failed to push event: {0}")]
    PushFailed(String),
}

/// Event pusher trait.
///
/// `push_to` targets exactly one connection and surfaces failure to the
/// caller; `broadcast` is the fanout primitive and tolerates partial
/// failure, because an unreachable member re-syncs from snapshots and
/// history on reconnect.
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Register a connection's outbound channel.
    async fn register(&self, conn_id: ConnectionId, sender: PusherChannel);

    /// Remove a connection's outbound channel.
    async fn unregister(&self, conn_id: ConnectionId);

    /// Push a serialized event to a single connection.
    async fn push_to(&self, conn_id: ConnectionId, payload: &str) -> Result<(), PushError>;

    /// Deliver a serialized event to each target at most once. Unreachable
    /// targets are logged and skipped.
    async fn broadcast(&self, targets: Vec<ConnectionId>, payload: &str) -> Result<(), PushError>;
}
