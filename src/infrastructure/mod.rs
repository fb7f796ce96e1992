//! Infrastructure layer: wire DTOs and concrete collaborator implementations.

pub mod dto;
pub mod event_pusher;
pub mod store;
