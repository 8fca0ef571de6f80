use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::client::{ClientHandle, ClientId, DeliveryFailure};
use super::handle::HubHandle;
use crate::message::Message;
use crate::room::models::{Room, RoomSummary, DEFAULT_ROOM};

/// Events processed by the hub loop, strictly one at a time
#[derive(Debug)]
pub enum HubCommand {
    Register(ClientHandle),
    Unregister(ClientId),
    Broadcast(Message),
    JoinRoom {
        client: ClientId,
        room: String,
    },
    CreateRoom {
        name: String,
        reply: oneshot::Sender<RoomSummary>,
    },
    ListRooms {
        reply: oneshot::Sender<Vec<RoomSummary>>,
    },
    ClientCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Sole owner of the client registry and room map
pub struct Hub {
    clients: HashMap<ClientId, ClientHandle>,
    rooms: HashMap<String, Room>,
}

impl Hub {
    /// Creates a hub containing only the default room
    pub fn new() -> Self {
        let mut hub = Self {
            clients: HashMap::new(),
            rooms: HashMap::new(),
        };
        hub.create_room(DEFAULT_ROOM);
        hub
    }

    /// Spawn the hub loop and return the handle used to reach it
    pub fn spawn(command_capacity: usize) -> (HubHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(command_capacity);
        let task = tokio::spawn(Self::new().run(receiver));
        (HubHandle::new(sender), task)
    }

    /// Process commands until every handle has been dropped
    pub async fn run(mut self, mut commands: mpsc::Receiver<HubCommand>) {
        info!(rooms = self.rooms.len(), "Hub started");

        while let Some(command) = commands.recv().await {
            self.handle(command);
        }

        info!(
            clients = self.clients.len(),
            rooms = self.rooms.len(),
            "Hub stopped - all handles dropped"
        );
    }

    pub fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(client) => self.register(client),
            HubCommand::Unregister(id) => self.unregister(id),
            HubCommand::Broadcast(message) => self.broadcast(message),
            HubCommand::JoinRoom { client, room } => self.join_room(client, room),
            HubCommand::CreateRoom { name, reply } => {
                let room = self.create_room(&name);
                if reply.send(room).is_err() {
                    debug!(room = %name, "Room creator went away before reply");
                }
            }
            HubCommand::ListRooms { reply } => {
                let _ = reply.send(self.list_rooms());
            }
            HubCommand::ClientCount { reply } => {
                let _ = reply.send(self.clients.len());
            }
        }
    }

    fn register(&mut self, client: ClientHandle) {
        let id = client.id();
        if self.clients.contains_key(&id) {
            warn!(client_id = %id, "Client already registered - ignoring");
            return;
        }

        self.clients.insert(id, client);
        info!(client_id = %id, total = self.clients.len(), "Client registered");
    }

    /// Removing the handle drops its sender, closing the outbound queue.
    /// A second unregister finds nothing and does nothing.
    fn unregister(&mut self, id: ClientId) {
        if self.clients.remove(&id).is_some() {
            info!(client_id = %id, total = self.clients.len(), "Client unregistered");
        }
    }

    fn join_room(&mut self, id: ClientId, room: String) {
        match self.clients.get_mut(&id) {
            Some(client) => {
                debug!(client_id = %id, room = %room, "Client joined room");
                client.join(room);
            }
            None => debug!(client_id = %id, room = %room, "Join from unknown client ignored"),
        }
    }

    fn broadcast(&mut self, message: Message) {
        // Unrouted messages are discarded
        let Some(room) = self.rooms.get_mut(&message.room) else {
            return;
        };
        room.record(message.clone());

        let target = message.room.clone();
        self.fan_out(&message, |client| client.is_in(&target));
    }

    /// Insert or replace a room and announce it to every client
    fn create_room(&mut self, name: &str) -> RoomSummary {
        let room = Room::new(name);
        let created = room.clone();
        if let Some(previous) = self.rooms.insert(room.id.clone(), room) {
            warn!(
                room = %name,
                orphaned_messages = previous.messages.len(),
                "Room recreated - previous history replaced"
            );
        } else {
            info!(room = %name, "Room created");
        }

        self.fan_out(&Message::room_update(name), |_| true);

        created.summary(self.members_of(&created.id))
    }

    fn list_rooms(&self) -> Vec<RoomSummary> {
        let mut rooms: Vec<RoomSummary> = self
            .rooms
            .values()
            .map(|room| room.summary(self.members_of(&room.id)))
            .collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }

    fn members_of(&self, room: &str) -> usize {
        self.clients.values().filter(|c| c.is_in(room)).count()
    }

    /// Queue `message` for every matching client without ever waiting.
    /// Clients that cannot take it are evicted.
    fn fan_out(&mut self, message: &Message, is_target: impl Fn(&ClientHandle) -> bool) {
        let mut evicted = Vec::new();

        for client in self.clients.values().filter(|c| is_target(c)) {
            if let Err(failure) = client.try_deliver(message.clone()) {
                evicted.push((client.id(), failure));
            }
        }

        for (id, failure) in evicted {
            self.clients.remove(&id);
            match failure {
                DeliveryFailure::QueueFull => warn!(
                    client_id = %id,
                    room = %message.room,
                    total = self.clients.len(),
                    "Outbound queue full - dropping slow client"
                ),
                DeliveryFailure::WriterGone => debug!(
                    client_id = %id,
                    total = self.clients.len(),
                    "Outbound queue closed - removing client"
                ),
            }
        }
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
