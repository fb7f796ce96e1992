//! HTTP API response DTOs.

use serde::Serialize;

use super::websocket::{ActiveRoomDto, RoomMemberDto};

/// Response body of `GET /api/rooms`.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveRoomsResponse {
    pub rooms: Vec<ActiveRoomDto>,
}

/// Response body of `GET /api/rooms/{room}/members`.
#[derive(Debug, Clone, Serialize)]
pub struct RoomMembersResponse {
    pub room: String,
    pub members: Vec<RoomMemberDto>,
    pub count: usize,
}
