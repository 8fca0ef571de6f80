use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use super::client::{ClientHandle, ClientId};
use super::actor::HubCommand;
use crate::message::Message;
use crate::room::models::RoomSummary;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HubError {
    #[error("hub is no longer running")]
    Closed,
}

/// Cloneable mailbox into the hub loop.
///
/// Every operation is a message; nothing here touches hub state directly.
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    pub(crate) fn new(commands: mpsc::Sender<HubCommand>) -> Self {
        Self { commands }
    }

    async fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.commands.send(command).await.map_err(|_| HubError::Closed)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> HubCommand,
    ) -> Result<T, HubError> {
        let (reply, response) = oneshot::channel();
        self.send(command(reply)).await?;
        response.await.map_err(|_| HubError::Closed)
    }

    /// Admit a client into the registry
    pub async fn register(&self, client: ClientHandle) -> Result<(), HubError> {
        self.send(HubCommand::Register(client)).await
    }

    /// Remove a client and close its outbound queue
    pub async fn unregister(&self, client: ClientId) -> Result<(), HubError> {
        self.send(HubCommand::Unregister(client)).await
    }

    /// Store a message in its room and fan it out to room members
    pub async fn broadcast(&self, message: Message) -> Result<(), HubError> {
        self.send(HubCommand::Broadcast(message)).await
    }

    /// Change which room a client receives broadcasts from
    pub async fn join_room(
        &self,
        client: ClientId,
        room: impl Into<String>,
    ) -> Result<(), HubError> {
        self.send(HubCommand::JoinRoom {
            client,
            room: room.into(),
        })
        .await
    }

    /// Create (or replace) a room and wait for the hub to confirm it
    pub async fn create_room(&self, name: impl Into<String>) -> Result<RoomSummary, HubError> {
        let name = name.into();
        self.request(|reply| HubCommand::CreateRoom { name, reply })
            .await
    }

    /// Snapshot of every room, sorted by name
    pub async fn list_rooms(&self) -> Result<Vec<RoomSummary>, HubError> {
        self.request(|reply| HubCommand::ListRooms { reply }).await
    }

    /// Number of registered clients
    pub async fn client_count(&self) -> Result<usize, HubError> {
        self.request(|reply| HubCommand::ClientCount { reply }).await
    }
}
