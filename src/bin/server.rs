//! Room coordinator server for a real-time chat relay.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use chat_relay_rs::{
    common::{logger::setup_logger, time::SystemClock},
    domain::CoordinatorState,
    infrastructure::{event_pusher::WebSocketEventPusher, store::InMemoryMessageStore},
    ui::{Server, state::AppState},
    usecase::{
        AcknowledgeReadUseCase, ActivityPingUseCase, ConnectUseCase, DisconnectUseCase,
        GetActiveRoomsUseCase, GetRoomMembersUseCase, JoinRoomUseCase, SendMessageUseCase,
    },
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Room coordinator for a real-time chat relay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. State + collaborators
    // 2. UseCases
    // 3. AppState
    // 4. Server

    let state = CoordinatorState::shared();
    let pusher = Arc::new(WebSocketEventPusher::new());
    let store = Arc::new(InMemoryMessageStore::new());
    let clock = Arc::new(SystemClock);

    let connect_usecase = Arc::new(ConnectUseCase::new(state.clone(), pusher.clone()));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        state.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let join_room_usecase = Arc::new(JoinRoomUseCase::new(
        state.clone(),
        pusher.clone(),
        store.clone(),
        clock.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        state.clone(),
        pusher.clone(),
        store.clone(),
        clock.clone(),
    ));
    let acknowledge_read_usecase =
        Arc::new(AcknowledgeReadUseCase::new(state.clone(), pusher.clone()));
    let activity_ping_usecase = Arc::new(ActivityPingUseCase::new(state.clone(), clock.clone()));
    let get_room_members_usecase =
        Arc::new(GetRoomMembersUseCase::new(state.clone(), pusher.clone()));
    let get_active_rooms_usecase =
        Arc::new(GetActiveRoomsUseCase::new(state.clone(), pusher.clone()));

    let app_state = Arc::new(AppState {
        connect_usecase,
        disconnect_usecase,
        join_room_usecase,
        send_message_usecase,
        acknowledge_read_usecase,
        activity_ping_usecase,
        get_room_members_usecase,
        get_active_rooms_usecase,
        pusher,
    });

    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
