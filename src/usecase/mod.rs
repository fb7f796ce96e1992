//! Use case layer: one handler per inbound session trigger.
//!
//! Each use case locks the coordinator state, applies its compound update to
//! completion, computes the outbound plan, releases the lock, and only then
//! talks to collaborators (store, pusher).

mod acknowledge_read;
mod activity_ping;
mod connect;
mod disconnect;
mod error;
mod join_room;
mod send_message;
mod snapshots;

pub use acknowledge_read::AcknowledgeReadUseCase;
pub use activity_ping::ActivityPingUseCase;
pub use connect::ConnectUseCase;
pub use disconnect::DisconnectUseCase;
pub use error::{JoinRoomError, RoomMembersError, SendMessageError};
pub use join_room::{HISTORY_LIMIT, JoinRoomUseCase};
pub use send_message::SendMessageUseCase;
pub use snapshots::{GetActiveRoomsUseCase, GetRoomMembersUseCase};
