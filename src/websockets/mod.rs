// Public API
pub use handler::websocket_handler;
pub use session::{ClientSession, SessionError};
pub use socket::{Frame, SocketError, SocketReceiver, SocketSender};

// Internal modules
mod handler;
mod session;
mod socket;
