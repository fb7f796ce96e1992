//! WebSocket connection handler and event dispatcher.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ImageRef, MessageBody, MessageId, RoomName, Username},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::{JoinRoomError, RoomMembersError, SendMessageError},
};

/// Connections start anonymous; identity and room arrive later over the
/// socket, so the upgrade itself takes no parameters.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains the connection's outbound channel into the
/// WebSocket sender. This is the only path events take to the client.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Register the connection before any inbound event can arrive.
    let (tx, rx) = mpsc::unbounded_channel();
    let mut send_task = pusher_loop(rx, sender);
    let conn_id = state.connect_usecase.execute(tx).await;

    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on connection '{}': {}", conn_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    dispatch_event(&state_clone, conn_id, &text).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("received ping from connection '{}'", conn_id);
                }
                Message::Close(_) => {
                    tracing::debug!("connection '{}' requested close", conn_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state.disconnect_usecase.execute(conn_id).await;
}

/// Parse and route one inbound event. Every failure is answered with a
/// targeted notice to the originating connection; nothing here tears the
/// session down.
async fn dispatch_event(state: &Arc<AppState>, conn_id: ConnectionId, text: &str) {
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("malformed event from connection '{}': {}", conn_id, e);
            notify_failure(state, conn_id, "malformed event").await;
            return;
        }
    };

    match event {
        ClientEvent::JoinRoom { username, room } => {
            let (username, room) = match (Username::try_from(username), RoomName::try_from(room)) {
                (Ok(username), Ok(room)) => (username, room),
                (Err(e), _) | (_, Err(e)) => {
                    notify_failure(state, conn_id, &e.to_string()).await;
                    return;
                }
            };
            match state.join_room_usecase.execute(conn_id, username, room).await {
                Ok(()) => {}
                Err(JoinRoomError::AlreadyJoined { current }) => {
                    notify_failure(
                        state,
                        conn_id,
                        &format!("already joined room '{}'", current),
                    )
                    .await;
                }
                Err(JoinRoomError::ConnectionGone) => {
                    tracing::debug!("join from vanished connection '{}'", conn_id);
                }
            }
        }
        ClientEvent::SendMessage { body, image_ref } => {
            let body = match body.map(MessageBody::new).transpose() {
                Ok(body) => body,
                Err(e) => {
                    notify_failure(state, conn_id, &e.to_string()).await;
                    return;
                }
            };
            let image = match image_ref.map(ImageRef::new).transpose() {
                Ok(image) => image,
                Err(e) => {
                    notify_failure(state, conn_id, &e.to_string()).await;
                    return;
                }
            };
            match state.send_message_usecase.execute(conn_id, body, image).await {
                Ok(_) => {}
                Err(SendMessageError::NotJoined) => {
                    notify_failure(state, conn_id, "join a room before sending").await;
                }
                Err(SendMessageError::EmptyMessage) => {
                    notify_failure(state, conn_id, "message must contain text or an image").await;
                }
                Err(SendMessageError::ConnectionGone) => {
                    tracing::debug!("send from vanished connection '{}'", conn_id);
                }
            }
        }
        ClientEvent::AcknowledgeRead { message_id } => {
            state
                .acknowledge_read_usecase
                .execute(conn_id, MessageId::new(message_id))
                .await;
        }
        ClientEvent::ActivityPing => {
            state.activity_ping_usecase.execute(conn_id).await;
        }
        ClientEvent::GetRoomMembers => {
            match state.get_room_members_usecase.execute(conn_id).await {
                Ok(()) => {}
                Err(RoomMembersError::NotJoined) => {
                    notify_failure(state, conn_id, "join a room first").await;
                }
            }
        }
        ClientEvent::GetActiveRooms => {
            state.get_active_rooms_usecase.execute(conn_id).await;
        }
    }
}

async fn notify_failure(state: &Arc<AppState>, conn_id: ConnectionId, reason: &str) {
    let event = ServerEvent::SendFailed {
        reason: reason.to_string(),
    };
    if let Err(e) = state.pusher.push_to(conn_id, &event.to_json()).await {
        tracing::debug!(
            "failed to notify connection '{}' of failure: {}",
            conn_id,
            e
        );
    }
}
