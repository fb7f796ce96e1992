//! Use case error types.
//!
//! These map the coordinator's error taxonomy: every variant is recoverable
//! and surfaced to the acting connection only; none is fatal to the process.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// A connection joins exactly one room for its lifetime.
    #[error("already joined room '{current}'")]
    AlreadyJoined { current: String },

    /// The connection terminated before the event was processed; treated as
    /// a benign no-op by the caller.
    #[error("connection is no longer registered")]
    ConnectionGone,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// Sending requires a room binding. The sender is asked to re-establish
    /// its join rather than having the message silently dropped.
    #[error("not joined to any room")]
    NotJoined,

    /// A message must carry text, an image reference, or both.
    #[error("message must contain text or an image")]
    EmptyMessage,

    /// The connection terminated before the event was processed.
    #[error("connection is no longer registered")]
    ConnectionGone,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomMembersError {
    #[error("not joined to any room")]
    NotJoined,
}
