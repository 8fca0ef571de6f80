use axum::{
    extract::{ws::WebSocket, State, WebSocketUpgrade},
    response::Response,
};
use futures::StreamExt;
use tracing::{info, warn};

use super::session::ClientSession;
use crate::shared::AppState;

/// WebSocket endpoint
/// GET /ws
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    info!("WebSocket connection requested");

    let limit = app_state.session_config.max_message_size;
    ws.max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| handle_websocket_connection(socket, app_state))
}

/// Handle the upgraded WebSocket connection
async fn handle_websocket_connection(socket: WebSocket, app_state: AppState) {
    let (session, outbound) =
        match ClientSession::connect(app_state.hub.clone(), app_state.session_config.clone()).await
        {
            Ok(connected) => connected,
            Err(e) => {
                warn!(error = %e, "Could not register client - closing connection");
                return;
            }
        };

    info!(client_id = %session.id(), "WebSocket connection established");

    let (sender, receiver) = socket.split();
    session.run(sender, receiver, outbound).await;
}
