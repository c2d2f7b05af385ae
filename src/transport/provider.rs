use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use super::types::{SendRequest, StreamChunk};

/// Errors that can occur while delivering a turn to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Transport misconfigured (bad URL, client build failure).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Backend returned a non-2xx response.
    Api { status: u16, message: String },
    /// Failed to parse the backend's response.
    Parse(String),
    /// The chunk channel was closed (UI dropped the receiver).
    ChannelClosed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Config(msg) => write!(f, "config error: {msg}"),
            TransportError::Network(msg) => write!(f, "network error: {msg}"),
            TransportError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            TransportError::Parse(msg) => write!(f, "parse error: {msg}"),
            TransportError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for TransportError {}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the name of the transport.
    fn name(&self) -> &str;

    /// Delivers the request and streams the assistant's reply into `sender`.
    /// Returns once the reply is complete or the request failed.
    async fn send_messages(
        &self,
        request: SendRequest,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError>;
}
