//! Offline transport that streams a canned reply word by word.
//!
//! Useful without a running backend, and it drives the same placeholder →
//! content → done path a streaming backend would.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::sync::mpsc::Sender;

use crate::transport::{SendRequest, StreamChunk, Transport, TransportError};

pub struct EchoTransport {
    word_delay: Duration,
}

impl EchoTransport {
    pub fn new(word_delay: Duration) -> Self {
        Self { word_delay }
    }
}

/// The reply for a request, as Markdown.
fn compose_reply(request: &SendRequest) -> String {
    let quoted: Vec<String> = request
        .message
        .trim()
        .lines()
        .map(|line| format!("> {line}"))
        .collect();
    let turns = request.history.len();
    let noun = if turns == 1 { "message" } else { "messages" };
    format!(
        "You said:\n\n{}\n\n_There {} {} {} earlier in this conversation._",
        quoted.join("\n"),
        if turns == 1 { "is" } else { "are" },
        turns,
        noun
    )
}

/// Splits text into chunks that keep their trailing whitespace, so
/// concatenating them reproduces the input exactly.
fn split_words(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut in_space = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            in_space = true;
        } else if in_space {
            chunks.push(&text[start..i]);
            start = i;
            in_space = false;
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

#[async_trait]
impl Transport for EchoTransport {
    fn name(&self) -> &str {
        "echo"
    }

    async fn send_messages(
        &self,
        request: SendRequest,
        sender: Sender<StreamChunk>,
    ) -> Result<(), TransportError> {
        let reply = compose_reply(&request);
        debug!(
            "Echo reply for generation {}: {} bytes",
            request.generation,
            reply.len()
        );

        if sender.send(StreamChunk::Placeholder).await.is_err() {
            warn!("Echo placeholder send failed: receiver dropped");
            return Err(TransportError::ChannelClosed);
        }

        for word in split_words(&reply) {
            if !self.word_delay.is_zero() {
                tokio::time::sleep(self.word_delay).await;
            }
            if sender
                .send(StreamChunk::Content(word.to_string()))
                .await
                .is_err()
            {
                warn!("Echo content send failed: receiver dropped");
                return Err(TransportError::ChannelClosed);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;

    #[test]
    fn test_split_words_round_trips() {
        let text = "You said:\n\n> hi  there\n";
        assert_eq!(split_words(text).concat(), text);
        assert_eq!(split_words("a b"), vec!["a ", "b"]);
        assert!(split_words("").is_empty());
    }

    #[test]
    fn test_compose_reply_quotes_and_counts() {
        let request = SendRequest {
            generation: 1,
            message: "line one\nline two".into(),
            history: vec![Message::user("q"), Message::assistant("a")],
        };
        let reply = compose_reply(&request);
        assert!(reply.contains("> line one\n> line two"));
        assert!(reply.contains("There are 2 messages earlier"));
    }

    #[tokio::test]
    async fn test_streams_placeholder_then_content() {
        let transport = EchoTransport::new(Duration::ZERO);
        let request = SendRequest {
            generation: 3,
            message: "ping".into(),
            history: vec![],
        };
        let (tx, mut rx) = tokio::sync::mpsc::channel(256);
        transport.send_messages(request, tx).await.unwrap();

        assert_eq!(rx.recv().await, Some(StreamChunk::Placeholder));
        let mut text = String::new();
        while let Some(chunk) = rx.recv().await {
            match chunk {
                StreamChunk::Content(s) => text.push_str(&s),
                other => panic!("unexpected chunk {:?}", other),
            }
        }
        assert!(text.starts_with("You said:"));
        assert!(text.contains("> ping"));
    }

    #[tokio::test]
    async fn test_closed_receiver_is_channel_closed() {
        let transport = EchoTransport::new(Duration::ZERO);
        let request = SendRequest {
            generation: 1,
            message: "ping".into(),
            history: vec![],
        };
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        drop(rx);
        let result = transport.send_messages(request, tx).await;
        assert_eq!(result, Err(TransportError::ChannelClosed));
    }
}
