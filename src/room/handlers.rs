use axum::{extract::State, Json};
use tracing::{info, instrument};

use super::{models::RoomSummary, types::RoomCreateRequest};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new room
///
/// POST /rooms/create
/// Creating a room that already exists replaces it
#[instrument(name = "create_room", skip(state))]
pub async fn create_room(
    State(state): State<AppState>,
    Json(request): Json<RoomCreateRequest>,
) -> Result<Json<RoomSummary>, AppError> {
    info!(name = %request.name, "Received create room request");

    let room = state.hub.create_room(request.name).await?;

    info!(room_id = %room.id, "Room created successfully");

    Ok(Json(room))
}

/// HTTP handler for listing all rooms
///
/// GET /rooms
/// Returns array of all rooms with their history
#[instrument(name = "list_rooms", skip(state))]
pub async fn list_rooms(State(state): State<AppState>) -> Result<Json<Vec<RoomSummary>>, AppError> {
    let rooms = state.hub.list_rooms().await?;

    info!(room_count = rooms.len(), "Rooms listed successfully");

    Ok(Json(rooms))
}
