//! # Conversation Data Model
//!
//! ```text
//! Message
//! ├── role: Role          // user | assistant
//! └── parts: Vec<Part>    // ordered fragments
//!     └── text: Option<String>   // None or "" = placeholder
//! ```
//!
//! A placeholder part stands for "content not yet arrived". It is never
//! rendered as text; it only keeps the loading indicator attached to the
//! newest turn while a reply is streaming in.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label shown in the bubble title.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "you",
            Role::Assistant => "truenotion",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn placeholder() -> Self {
        Self { text: None }
    }

    pub fn is_placeholder(&self) -> bool {
        self.text.as_deref().is_none_or(str::is_empty)
    }

    /// The renderable text, or `None` for placeholders.
    pub fn as_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            parts: vec![Part::text(text)],
        }
    }

    /// An assistant turn whose content has not arrived yet.
    pub fn assistant_placeholder() -> Self {
        Self {
            role: Role::Assistant,
            parts: vec![Part::placeholder()],
        }
    }

    /// True when no part carries renderable text.
    pub fn is_placeholder(&self) -> bool {
        self.parts.iter().all(Part::is_placeholder)
    }

    /// Renderable parts, in order.
    pub fn text_parts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(Part::as_text)
    }

    /// All renderable parts joined with blank lines.
    pub fn text(&self) -> String {
        self.text_parts().collect::<Vec<_>>().join("\n\n")
    }
}
