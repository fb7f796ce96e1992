//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_active_rooms, get_room_members, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the coordinator's router over a prepared `AppState`.
///
/// Exposed separately from [`Server::run`] so integration tests can serve
/// the same routes on an ephemeral port.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/rooms", get(get_active_rooms))
        .route("/api/rooms/{room}/members", get(get_room_members))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Room coordinator server.
///
/// Owns the wired application state and runs the axum server with graceful
/// shutdown.
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Run the coordinator until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server fails
    /// while running.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = build_router(self.state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "room coordinator listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
