//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::EventPusher;
use crate::usecase::{
    AcknowledgeReadUseCase, ActivityPingUseCase, ConnectUseCase, DisconnectUseCase,
    GetActiveRoomsUseCase, GetRoomMembersUseCase, JoinRoomUseCase, SendMessageUseCase,
};

/// Shared application state: one use case per session trigger, plus the
/// pusher for dispatcher-level failure notices.
pub struct AppState {
    pub connect_usecase: Arc<ConnectUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub acknowledge_read_usecase: Arc<AcknowledgeReadUseCase>,
    pub activity_ping_usecase: Arc<ActivityPingUseCase>,
    pub get_room_members_usecase: Arc<GetRoomMembersUseCase>,
    pub get_active_rooms_usecase: Arc<GetActiveRoomsUseCase>,
    pub pusher: Arc<dyn EventPusher>,
}
