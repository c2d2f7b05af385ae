//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::state::App;
use crate::transport::{SendRequest, StreamChunk, Transport, TransportError};

/// Replays a fixed list of chunks, then returns `outcome`.
pub struct ScriptedTransport {
    pub chunks: Vec<StreamChunk>,
    pub outcome: Result<(), TransportError>,
}

impl ScriptedTransport {
    pub fn replying(chunks: Vec<StreamChunk>) -> Self {
        Self {
            chunks,
            outcome: Ok(()),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            chunks: vec![StreamChunk::Placeholder],
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send_messages(
        &self,
        _request: SendRequest,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        for chunk in self.chunks.iter().cloned() {
            sender
                .send(chunk)
                .await
                .map_err(|_| TransportError::ChannelClosed)?;
        }
        self.outcome.clone()
    }
}

/// Creates a test App with no transport attached.
pub fn test_app() -> App {
    App::new("test-backend".to_string())
}
