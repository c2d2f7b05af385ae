//! # Transcript View
//!
//! Derives what the presentation layer should draw from the transcript and
//! the pending flag. Recomputed every frame; holds no state of its own.
//!
//! ```text
//! []                         → Introduction
//! [user "Hi"], pending=true  → [Message(user, ["Hi"]), LoadingIndicator]
//! [user "Hi", asst ""], pending=true
//!                            → [Message(user, ["Hi"]), LoadingIndicator]
//! ```

use crate::core::message::{Message, Role};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem<'a> {
    Message {
        /// Position in the transcript.
        index: usize,
        role: Role,
        /// Non-empty parts, in order.
        parts: Vec<&'a str>,
    },
    /// Typing indicator, attached after the newest turn.
    LoadingIndicator,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptView<'a> {
    /// Empty transcript: show the welcome content instead of a list.
    Introduction,
    Transcript(Vec<RenderItem<'a>>),
}

impl<'a> TranscriptView<'a> {
    pub fn build(messages: &'a [Message], pending: bool) -> Self {
        if messages.is_empty() {
            return TranscriptView::Introduction;
        }

        let mut items: Vec<RenderItem<'a>> = messages
            .iter()
            .enumerate()
            .filter_map(|(index, message)| {
                let parts: Vec<&str> = message.text_parts().collect();
                // Placeholder-only turns exist to carry the indicator
                (!parts.is_empty()).then_some(RenderItem::Message {
                    index,
                    role: message.role,
                    parts,
                })
            })
            .collect();

        if pending {
            items.push(RenderItem::LoadingIndicator);
        }

        TranscriptView::Transcript(items)
    }

    pub fn is_introduction(&self) -> bool {
        matches!(self, TranscriptView::Introduction)
    }

    pub fn items(&self) -> &[RenderItem<'a>] {
        match self {
            TranscriptView::Introduction => &[],
            TranscriptView::Transcript(items) => items,
        }
    }
}
