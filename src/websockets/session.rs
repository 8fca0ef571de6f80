use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::{interval_at, timeout, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::socket::{Frame, SocketError, SocketReceiver, SocketSender};
use crate::config::SessionConfig;
use crate::hub::{ClientHandle, ClientId, HubError, HubHandle};
use crate::message::{now_timestamp, ClientIntent, DecodeError, Message};

/// Reasons a pump stops early. Each one ends only this client's session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Socket(#[from] SocketError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to encode outbound message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("peer timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// A registered client connection and its two pumps
pub struct ClientSession {
    id: ClientId,
    hub: HubHandle,
    config: SessionConfig,
}

impl ClientSession {
    /// Register a fresh client with the hub.
    /// Returns the session and the receiving end of its outbound queue.
    pub async fn connect(
        hub: HubHandle,
        config: SessionConfig,
    ) -> Result<(Self, mpsc::Receiver<Message>), HubError> {
        let id = ClientId::new();
        let (handle, outbound) = ClientHandle::channel(id, config.outbound_capacity);
        hub.register(handle).await?;

        Ok((Self { id, hub, config }, outbound))
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Run both pumps until the connection ends, then unregister.
    ///
    /// The outbound pump gets its own task. The inbound pump runs here and
    /// is abandoned if the outbound side finishes first.
    pub async fn run<S, R>(self, sender: S, mut receiver: R, outbound: mpsc::Receiver<Message>)
    where
        S: SocketSender + 'static,
        R: SocketReceiver,
    {
        let id = self.id;
        info!(client_id = %id, "Client session started");

        let write_config = self.config.clone();
        let mut writer = tokio::spawn(async move {
            let result = write_pump(sender, outbound, &write_config).await;
            match &result {
                Ok(()) => debug!(client_id = %id, "Outbound pump finished - queue closed"),
                Err(e) => warn!(client_id = %id, error = %e, "Outbound pump failed"),
            }
        });

        let writer_done = tokio::select! {
            result = read_pump(&mut receiver, &self.hub, id, &self.config) => {
                match result {
                    Ok(()) => info!(client_id = %id, "Client closed connection"),
                    Err(e) => warn!(client_id = %id, error = %e, "Inbound pump failed"),
                }
                false
            }
            _ = &mut writer => true,
        };

        if let Err(e) = self.hub.unregister(id).await {
            debug!(client_id = %id, error = %e, "Unregister skipped");
        }

        // Unregister closed the queue, so the writer drains and exits
        if !writer_done {
            if let Err(e) = writer.await {
                warn!(client_id = %id, error = %e, "Outbound pump task panicked");
            }
        }

        info!(client_id = %id, "Client session ended");
    }
}

/// Decode frames from the peer and hand them to the hub
async fn read_pump<R: SocketReceiver>(
    receiver: &mut R,
    hub: &HubHandle,
    id: ClientId,
    config: &SessionConfig,
) -> Result<(), SessionError> {
    loop {
        let frame = timeout(config.pong_wait, receiver.receive_frame())
            .await
            .map_err(|_| SessionError::Timeout(config.pong_wait))??;

        let bytes = match frame {
            Some(Frame::Text(text)) => text.into_bytes(),
            Some(Frame::Binary(bytes)) => bytes,
            Some(Frame::Heartbeat) => continue,
            None => return Ok(()),
        };

        let message = Message::decode(&bytes, config.max_message_size)?.stamped(now_timestamp());

        match message.into_intent() {
            ClientIntent::JoinRoom(room) => hub.join_room(id, room).await?,
            ClientIntent::Post(message) => hub.broadcast(message).await?,
            ClientIntent::Ignored(kind) => {
                warn!(client_id = %id, message_type = ?kind, "Dropping message type clients may not send");
            }
        }
    }
}

/// Drain the outbound queue to the peer, probing liveness when idle
async fn write_pump<S: SocketSender>(
    mut sender: S,
    mut outbound: mpsc::Receiver<Message>,
    config: &SessionConfig,
) -> Result<(), SessionError> {
    let mut heartbeat = interval_at(Instant::now() + config.ping_period, config.ping_period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            next = outbound.recv() => match next {
                Some(message) => {
                    let text = serde_json::to_string(&message)?;
                    with_deadline(config.write_wait, sender.send_text(text)).await?;
                    heartbeat.reset();
                }
                None => {
                    // Hub closed the queue
                    with_deadline(config.write_wait, sender.close()).await?;
                    return Ok(());
                }
            },
            _ = heartbeat.tick() => {
                with_deadline(config.write_wait, sender.send_ping()).await?;
            }
        }
    }
}

async fn with_deadline<F>(limit: Duration, write: F) -> Result<(), SessionError>
where
    F: Future<Output = Result<(), SocketError>>,
{
    timeout(limit, write)
        .await
        .map_err(|_| SessionError::Timeout(limit))?
        .map_err(SessionError::from)
}
