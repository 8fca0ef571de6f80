use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sender name used for messages synthesized by the hub
pub const SYSTEM_SENDER: &str = "system";

/// Message types exchanged over the chat socket
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    // Client -> Server (and echoed back to room members)
    Text,
    // Client -> Server, room-join directive
    System,
    // Server -> Client, a room was created
    RoomUpdate,
}

/// A chat message as it travels on the wire and is kept in room history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub room: String,
    /// Unix seconds, assigned by the server on receipt
    #[serde(default)]
    pub timestamp: i64,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("frame of {len} bytes exceeds limit of {max} bytes")]
    Oversized { len: usize, max: usize },

    #[error("invalid message: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a decoded inbound message asks the hub to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientIntent {
    /// Move this client into the named room
    JoinRoom(String),
    /// Store in room history and fan out to room members
    Post(Message),
    /// Not accepted from clients
    Ignored(MessageType),
}

impl Message {
    /// Create a text message stamped with the current time
    pub fn text(
        room: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            message_type: MessageType::Text,
            content: content.into(),
            sender: sender.into(),
            room: room.into(),
            timestamp: now_timestamp(),
        }
    }

    /// Create the global notification announcing a new room
    pub fn room_update(room_name: &str) -> Self {
        Self {
            message_type: MessageType::RoomUpdate,
            content: room_name.to_string(),
            sender: SYSTEM_SENDER.to_string(),
            room: room_name.to_string(),
            timestamp: now_timestamp(),
        }
    }

    /// Decode one inbound frame, enforcing the size limit before parsing
    pub fn decode(frame: &[u8], max_size: usize) -> Result<Self, DecodeError> {
        if frame.len() > max_size {
            return Err(DecodeError::Oversized {
                len: frame.len(),
                max: max_size,
            });
        }
        Ok(serde_json::from_slice(frame)?)
    }

    /// Overwrite whatever timestamp the client supplied
    pub fn stamped(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Classify an inbound message by what the hub should do with it
    pub fn into_intent(self) -> ClientIntent {
        match self.message_type {
            MessageType::System => ClientIntent::JoinRoom(self.room),
            MessageType::Text => ClientIntent::Post(self),
            MessageType::RoomUpdate => ClientIntent::Ignored(MessageType::RoomUpdate),
        }
    }
}

/// Current Unix time in seconds
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}
