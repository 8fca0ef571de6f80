#![allow(dead_code)] // Test utilities may not all be used in every test

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::{timeout, Duration};

use minichat::{Frame, Message, SocketError, SocketReceiver, SocketSender};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Everything the server wrote to the mock connection
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(String),
    Ping,
    Close,
}

/// Write half handed to the session under test
pub struct MockSender {
    sent: mpsc::UnboundedSender<Sent>,
    gate: Option<Arc<Semaphore>>,
    fail_sends: bool,
}

impl MockSender {
    async fn record(&mut self, item: Sent) -> Result<(), SocketError> {
        if self.fail_sends {
            return Err(SocketError::SendFailed("peer reset".to_string()));
        }
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| SocketError::SendFailed(e.to_string()))?
                .forget();
        }
        let _ = self.sent.send(item);
        Ok(())
    }
}

#[async_trait]
impl SocketSender for MockSender {
    async fn send_text(&mut self, text: String) -> Result<(), SocketError> {
        self.record(Sent::Text(text)).await
    }

    async fn send_ping(&mut self) -> Result<(), SocketError> {
        self.record(Sent::Ping).await
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.record(Sent::Close).await
    }
}

/// Read half handed to the session under test
pub struct MockReceiver {
    frames: mpsc::UnboundedReceiver<Result<Frame, SocketError>>,
}

#[async_trait]
impl SocketReceiver for MockReceiver {
    async fn receive_frame(&mut self) -> Result<Option<Frame>, SocketError> {
        match self.frames.recv().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

/// The remote end of a mock connection, driven by the test
pub struct MockPeer {
    frames: Option<mpsc::UnboundedSender<Result<Frame, SocketError>>>,
    sent: mpsc::UnboundedReceiver<Sent>,
    gate: Option<Arc<Semaphore>>,
}

/// How the mock write half behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Normal,
    /// Every write waits for `MockPeer::release`
    Gated,
    /// Every write fails
    Failing,
}

pub fn mock_socket(mode: WriteMode) -> (MockSender, MockReceiver, MockPeer) {
    let (frame_tx, frame_rx) = mpsc::unbounded_channel();
    let (sent_tx, sent_rx) = mpsc::unbounded_channel();
    let gate = (mode == WriteMode::Gated).then(|| Arc::new(Semaphore::new(0)));

    let sender = MockSender {
        sent: sent_tx,
        gate: gate.clone(),
        fail_sends: mode == WriteMode::Failing,
    };
    let receiver = MockReceiver { frames: frame_rx };
    let peer = MockPeer {
        frames: Some(frame_tx),
        sent: sent_rx,
        gate,
    };
    (sender, receiver, peer)
}

impl MockPeer {
    /// Send a raw text frame to the server
    pub fn send_text(&self, text: impl Into<String>) {
        if let Some(frames) = &self.frames {
            let _ = frames.send(Ok(Frame::Text(text.into())));
        }
    }

    pub fn send_json(&self, value: serde_json::Value) {
        self.send_text(value.to_string());
    }

    /// Ask to be moved into `room`
    pub fn join(&self, room: &str) {
        self.send_json(serde_json::json!({
            "type": "system",
            "content": "joined",
            "sender": "peer",
            "room": room,
        }));
    }

    pub fn say(&self, room: &str, content: &str) {
        self.send_json(serde_json::json!({
            "type": "text",
            "content": content,
            "sender": "peer",
            "room": room,
            "timestamp": 42,
        }));
    }

    pub fn send_error(&self) {
        if let Some(frames) = &self.frames {
            let _ = frames.send(Err(SocketError::ReceiveFailed("reset".to_string())));
        }
    }

    /// Close the read side as if the client went away
    pub fn disconnect(&mut self) {
        self.frames = None;
    }

    /// Let `permits` gated writes through
    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    /// Next thing the server wrote, if any arrives within a second
    pub async fn next_sent(&mut self) -> Option<Sent> {
        timeout(Duration::from_secs(1), self.sent.recv())
            .await
            .ok()
            .flatten()
    }

    /// Next thing the server wrote, without a wall-clock limit.
    /// Use with paused time.
    pub async fn wait_sent(&mut self) -> Option<Sent> {
        self.sent.recv().await
    }

    /// Next text frame decoded as a chat message
    pub async fn next_message(&mut self) -> Message {
        match self.next_sent().await {
            Some(Sent::Text(text)) => serde_json::from_str(&text).unwrap(),
            other => panic!("expected a text frame, got {:?}", other),
        }
    }
}
