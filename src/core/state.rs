//! # Application State
//!
//! Core conversation state. No TUI-specific types; presentation state lives
//! in the `tui` module.
//!
//! ```text
//! App
//! ├── store: MessageStore     // the transcript
//! ├── pending: bool           // a send is awaiting its transport result
//! ├── generation: u64         // bumped by every send and every clear
//! ├── status_message: String  // status bar text
//! ├── backend_label: String   // which transport we talk to
//! └── error: Option<String>   // last transport failure
//! ```
//!
//! State changes only happen through the controller (see controller.rs),
//! driven by `update(state, action)` in action.rs.

use crate::core::store::MessageStore;
use crate::core::view::TranscriptView;

pub struct App {
    pub store: MessageStore,
    pub pending: bool,
    pub generation: u64,
    pub status_message: String,
    pub backend_label: String,
    pub error: Option<String>,
}

impl App {
    pub fn new(backend_label: String) -> Self {
        Self {
            store: MessageStore::new(),
            pending: false,
            generation: 0,
            status_message: String::from("Welcome to TrueNotion AI!"),
            backend_label,
            error: None,
        }
    }

    /// Immutable snapshot handed to the render layer each frame.
    pub fn view(&self) -> TranscriptView<'_> {
        TranscriptView::build(self.store.get(), self.pending)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to TrueNotion AI!");
        assert!(!app.pending);
        assert!(app.store.is_empty());
        assert_eq!(app.generation, 0);
        assert_eq!(app.backend_label, "test-backend");
        assert!(app.view().is_introduction());
    }
}
