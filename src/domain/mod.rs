//! Domain layer: value objects, the coordinator state, and the interfaces
//! the coordinator requires from its collaborators.

mod error;
mod model;
mod presence;
mod pusher;
mod receipts;
mod registry;
mod rooms;
mod state;
mod store;

pub use error::DomainError;
pub use model::{
    ChatMessage, ConnectionId, ImageRef, MessageBody, MessageId, RoomName, Timestamp, Username,
};
pub use presence::{PresenceTable, UserPresence};
pub use pusher::{EventPusher, PushError, PusherChannel};
pub use receipts::{AckOutcome, ReadReceiptTracker};
pub use registry::{Binding, ConnectionRegistry, RegistryError};
pub use rooms::{LastMessage, RoomDirectory};
pub use state::{ActiveRoom, CoordinatorState, RoomMember, SharedState};
pub use store::{MessageStore, StoreError};

#[cfg(test)]
pub use store::MockMessageStore;
