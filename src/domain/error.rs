//! Validation errors for domain value objects.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("username must be at most {0} characters")]
    UsernameTooLong(usize),

    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("room name must be at most {0} characters")]
    RoomNameTooLong(usize),

    #[error("message body must not be empty")]
    EmptyBody,

    #[error("message body must be at most {0} characters")]
    BodyTooLong(usize),

    #[error("image reference must not be empty")]
    EmptyImageRef,
}
