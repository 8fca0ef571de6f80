use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::room;
use crate::shared::AppState;
use crate::websockets::websocket_handler;

/// Responds "OK" while the server is running
pub async fn health() -> &'static str {
    "OK"
}

/// Build the application router
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/health", get(health))
        .route("/rooms", get(room::list_rooms))
        .route("/rooms/create", post(room::create_room))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
