// Library crate for the chat server
// This file exposes the public API for integration tests

pub mod config;
pub mod hub;
pub mod message;
pub mod room;
pub mod router;
pub mod shared;
pub mod websockets;

// Re-export commonly used types for easier access in tests
pub use config::{ServerConfig, SessionConfig};
pub use hub::{ClientHandle, ClientId, Hub, HubError, HubHandle};
pub use message::{Message, MessageType};
pub use room::{RoomSummary, DEFAULT_ROOM};
pub use router::build_router;
pub use shared::{AppError, AppState};
pub use websockets::{ClientSession, Frame, SocketError, SocketReceiver, SocketSender};
