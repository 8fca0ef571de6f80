use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Name of the room that exists from hub startup
pub const DEFAULT_ROOM: &str = "General";

/// A named channel with its in-memory message history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String, // Same as name, so names are unique
    pub name: String,
    pub messages: Vec<Message>,
}

impl Room {
    /// Creates an empty room whose id is derived from its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            messages: Vec::new(),
        }
    }

    /// Append a message to the end of the history log
    pub fn record(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Snapshot of this room for API responses
    pub fn summary(&self, num_clients: usize) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            num_clients,
            messages: self.messages.clone(),
        }
    }
}

/// Room as returned by the room listing and creation endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: String,
    pub name: String,
    pub num_clients: usize,
    pub messages: Vec<Message>,
}
