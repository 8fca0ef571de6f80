use async_trait::async_trait;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use thiserror::Error;

/// One inbound frame, reduced to what the session cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Ping or pong; only proves the peer is alive
    Heartbeat,
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("send failed: {0}")]
    SendFailed(String),

    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// Write half of a client connection
#[async_trait]
pub trait SocketSender: Send {
    /// Send a text frame to the client
    async fn send_text(&mut self, text: String) -> Result<(), SocketError>;

    /// Send a liveness probe
    async fn send_ping(&mut self) -> Result<(), SocketError>;

    /// Tell the client we are closing
    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Read half of a client connection
#[async_trait]
pub trait SocketReceiver: Send {
    /// Receive the next frame (None once the peer has closed)
    async fn receive_frame(&mut self) -> Result<Option<Frame>, SocketError>;
}

#[async_trait]
impl SocketSender for SplitSink<WebSocket, WsMessage> {
    async fn send_text(&mut self, text: String) -> Result<(), SocketError> {
        self.send(WsMessage::Text(text))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn send_ping(&mut self) -> Result<(), SocketError> {
        self.send(WsMessage::Ping(Vec::new()))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(WsMessage::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl SocketReceiver for SplitStream<WebSocket> {
    async fn receive_frame(&mut self) -> Result<Option<Frame>, SocketError> {
        match self.next().await {
            Some(Ok(WsMessage::Text(text))) => Ok(Some(Frame::Text(text))),
            Some(Ok(WsMessage::Binary(bytes))) => Ok(Some(Frame::Binary(bytes))),
            Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_))) => Ok(Some(Frame::Heartbeat)),
            Some(Ok(WsMessage::Close(_))) => Ok(None),
            Some(Err(e)) => Err(SocketError::ReceiveFailed(e.to_string())),
            None => Ok(None), // Connection closed
        }
    }
}
