//! # Message Store
//!
//! Single owner of the transcript. Nothing else mutates the message list.
//!
//! Two counters let dependents skip work:
//! - `revision` bumps on every mutation (redraw needed)
//! - `epoch` bumps on `replace_all` only (cached layout is no longer valid)

use super::message::Message;

#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    revision: u64,
    epoch: u64,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `message` to the end of the transcript.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }

    /// Atomically substitutes the whole transcript (`vec![]` clears it).
    pub fn replace_all(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.revision += 1;
        self.epoch += 1;
    }

    /// Current transcript in canonical order.
    pub fn get(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// In-place amendment of the newest message. Reserved for streaming
    /// reconciliation; returns `false` when the transcript is empty.
    pub(crate) fn amend_last(&mut self, amend: impl FnOnce(&mut Message)) -> bool {
        match self.messages.last_mut() {
            Some(last) => {
                amend(last);
                self.revision += 1;
                true
            }
            None => false,
        }
    }
}
