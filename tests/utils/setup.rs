#![allow(dead_code)] // Test utilities may not all be used in every test

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use minichat::{ClientHandle, ClientId, ClientSession, Hub, HubHandle, Message, SessionConfig};

use super::mocks::{mock_socket, MockPeer, WriteMode};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub hub: HubHandle,
    pub config: SessionConfig,
    pub _hub_task: JoinHandle<()>,
}

/// A client registered straight with the hub, with no pumps attached
pub struct TestClient {
    pub id: ClientId,
    pub outbound: mpsc::Receiver<Message>,
}

/// A full client session running against a mock connection
pub struct TestSession {
    pub id: ClientId,
    pub peer: MockPeer,
    pub task: JoinHandle<()>,
}

pub struct TestSetupBuilder {
    config: SessionConfig,
    rooms: Vec<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            rooms: vec![],
        }
    }

    pub fn with_outbound_capacity(mut self, capacity: usize) -> Self {
        self.config.outbound_capacity = capacity;
        self
    }

    pub fn with_rooms(mut self, rooms: Vec<&str>) -> Self {
        self.rooms = rooms.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub async fn build(self) -> TestSetup {
        let (hub, hub_task) = Hub::spawn(self.config.hub_capacity);

        for room in &self.rooms {
            hub.create_room(room.as_str()).await.unwrap();
        }

        TestSetup {
            hub,
            config: self.config,
            _hub_task: hub_task,
        }
    }
}

impl TestSetup {
    /// Register a bare client, optionally placing it in a room
    pub async fn connect(&self, room: Option<&str>) -> TestClient {
        let id = ClientId::new();
        let (handle, outbound) = ClientHandle::channel(id, self.config.outbound_capacity);
        self.hub.register(handle).await.unwrap();
        if let Some(room) = room {
            self.hub.join_room(id, room).await.unwrap();
        }
        TestClient { id, outbound }
    }

    /// Start a full session over a mock socket
    pub async fn start_session(&self, mode: WriteMode) -> TestSession {
        let (session, outbound) = ClientSession::connect(self.hub.clone(), self.config.clone())
            .await
            .unwrap();
        let id = session.id();
        let (sender, receiver, peer) = mock_socket(mode);
        let task = tokio::spawn(session.run(sender, receiver, outbound));
        TestSession { id, peer, task }
    }

    /// Wait until every command sent so far has been processed.
    /// The hub handles commands in order, so any reply works as a barrier.
    pub async fn settle(&self) -> usize {
        self.hub.client_count().await.unwrap()
    }

    /// Current history of `room`
    pub async fn history(&self, room: &str) -> Vec<Message> {
        self.hub
            .list_rooms()
            .await
            .unwrap()
            .into_iter()
            .find(|r| r.name == room)
            .map(|r| r.messages)
            .unwrap_or_default()
    }
}
