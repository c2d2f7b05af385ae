//! HTTP transport for the TrueNotion backend.
//!
//! The backend exposes a single non-streaming endpoint:
//!
//! ```text
//! POST {base_url}/chat
//! { "question": "...", "history": [["question", "answer"], ...] }
//! → { "answer": "..." }
//! ```
//!
//! History is sent as completed question/answer pairs, so the transcript is
//! folded into pairs here rather than in the controller.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::Sender;

use crate::core::message::{Message, Role};
use crate::transport::{SendRequest, StreamChunk, Transport, TransportError};

// ============================================================================
// Backend Wire Types
// ============================================================================

/// The request body for `/chat`
#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    question: &'a str,
    history: Vec<(String, String)>,
}

/// The response body for `/chat`
#[derive(Deserialize, Debug)]
struct ChatResponse {
    answer: Option<String>,
}

/// Shown when the backend answers with `null`.
const EMPTY_ANSWER_FALLBACK: &str = "Sorry, something went wrong. Please try again.";

// ============================================================================
// Translation Layer
// ============================================================================

/// Folds the transcript into `(question, answer)` pairs.
///
/// A user turn is paired with the assistant turn that follows it. Unanswered
/// questions and placeholder turns are skipped.
fn history_pairs(history: &[Message]) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut question: Option<String> = None;

    for message in history.iter().filter(|m| !m.is_placeholder()) {
        match message.role {
            Role::User => question = Some(message.text()),
            Role::Assistant => {
                if let Some(q) = question.take() {
                    pairs.push((q, message.text()));
                }
            }
        }
    }
    pairs
}

// ============================================================================
// Transport Implementation
// ============================================================================

pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Config(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send_messages(
        &self,
        request: SendRequest,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        let body = ChatRequest {
            question: &request.message,
            history: history_pairs(&request.history),
        };

        info!(
            "TrueNotion /chat request: generation={}, history_pairs={}",
            request.generation,
            body.history.len()
        );

        if sender.send(StreamChunk::Placeholder).await.is_err() {
            warn!("Placeholder send failed: receiver dropped");
            return Err(TransportError::ChannelClosed);
        }

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        debug!("TrueNotion response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("TrueNotion API error: {} - {}", status, err_body);
            return Err(TransportError::Api {
                status,
                message: err_body,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| TransportError::Parse(e.to_string()))?;

        let answer = parsed
            .answer
            .unwrap_or_else(|| EMPTY_ANSWER_FALLBACK.to_string());
        info!("TrueNotion answer received: {} bytes", answer.len());

        if sender
            .send(StreamChunk::Message(Message::assistant(answer)))
            .await
            .is_err()
        {
            warn!("Answer send failed: receiver dropped");
            return Err(TransportError::ChannelClosed);
        }
        Ok(())
    }
}
