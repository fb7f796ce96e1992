//! HTTP API endpoint handlers.
//!
//! Read-only views over the coordinator state, for clients that want the
//! directory or a membership snapshot without holding a WebSocket open.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::RoomName,
    infrastructure::dto::http::{ActiveRoomsResponse, RoomMembersResponse},
    infrastructure::dto::websocket::{ActiveRoomDto, RoomMemberDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the active-room directory
pub async fn get_active_rooms(State(state): State<Arc<AppState>>) -> Json<ActiveRoomsResponse> {
    let active = state.get_active_rooms_usecase.snapshot().await;
    Json(ActiveRoomsResponse {
        rooms: active.iter().map(ActiveRoomDto::from).collect(),
    })
}

/// Get a room's membership snapshot by name
pub async fn get_room_members(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomMembersResponse>, StatusCode> {
    let room = RoomName::new(room).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.get_room_members_usecase.members_of(&room).await {
        Some((members, count)) => Ok(Json(RoomMembersResponse {
            room: room.as_str().to_string(),
            members: members.iter().map(RoomMemberDto::from).collect(),
            count,
        })),
        // Empty rooms do not exist, so absence is always 404.
        None => Err(StatusCode::NOT_FOUND),
    }
}
