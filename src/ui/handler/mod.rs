//! HTTP and WebSocket endpoint handlers.

mod http;
mod websocket;

pub use http::{get_active_rooms, get_room_members, health_check};
pub use websocket::websocket_handler;
