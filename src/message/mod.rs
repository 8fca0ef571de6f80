// Public API
pub use models::{now_timestamp, ClientIntent, DecodeError, Message, MessageType, SYSTEM_SENDER};

// Internal modules
mod models;
