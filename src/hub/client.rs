use std::fmt;

use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::message::Message;

/// Opaque identity of one connected client session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a message could not be queued for a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// Outbound queue is at capacity (slow consumer)
    QueueFull,
    /// The session's writer is already gone
    WriterGone,
}

/// Registry entry for a client, owned by the hub while registered.
///
/// Dropping the handle drops the only sender of the outbound queue, which is
/// how the hub closes a client's queue.
#[derive(Debug)]
pub struct ClientHandle {
    id: ClientId,
    current_room: Option<String>,
    outbound: mpsc::Sender<Message>,
}

impl ClientHandle {
    /// Create a handle together with the receiving end of its outbound queue.
    /// A capacity of zero is raised to one.
    pub fn channel(id: ClientId, capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (outbound, receiver) = mpsc::channel(capacity.max(1));
        let handle = Self {
            id,
            current_room: None,
            outbound,
        };
        (handle, receiver)
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn current_room(&self) -> Option<&str> {
        self.current_room.as_deref()
    }

    pub fn is_in(&self, room: &str) -> bool {
        self.current_room.as_deref() == Some(room)
    }

    pub(crate) fn join(&mut self, room: String) {
        self.current_room = Some(room);
    }

    /// Queue a message without waiting for space
    pub(crate) fn try_deliver(&self, message: Message) -> Result<(), DeliveryFailure> {
        self.outbound.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryFailure::QueueFull,
            TrySendError::Closed(_) => DeliveryFailure::WriterGone,
        })
    }
}
