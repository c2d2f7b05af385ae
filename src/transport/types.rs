use crate::core::message::Message;

/// One turn handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    /// Generation that issued this request; echoed back with every result.
    pub generation: u64,
    /// Raw user input, untrimmed.
    pub message: String,
    /// Transcript as it was before this turn's user message was appended.
    pub history: Vec<Message>,
}

/// Represents one incremental result from the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// The assistant turn has started but no content has arrived.
    Placeholder,
    /// A piece of assistant text to append to the current turn.
    Content(String),
    /// A complete assistant message.
    Message(Message),
}
