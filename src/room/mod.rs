// Public API - what other modules can use
pub use handlers::{create_room, list_rooms};
pub use models::{Room, RoomSummary, DEFAULT_ROOM};
pub use types::RoomCreateRequest;

// Internal modules
mod handlers;
pub mod models;
mod types;
