//! # TitleBar Component
//!
//! Top status bar showing application state and notifications.
//!
//! ## Responsibilities
//!
//! - Display which backend the conversation talks to
//! - Display the status message, or the last transport error in red
//! - Show "↓ New" indicator when there's unseen content below scroll
//!
//! TitleBar is purely presentational: every field is a prop copied from
//! `App` or the message list state when the frame is drawn.
//!
//! ```text
//! TrueNotion AI (backend: echo) | Welcome to TrueNotion AI! | ↓ New
//! TrueNotion AI (backend: http) | Error: network error: ...
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    pub backend_label: String,
    pub status_message: String,
    /// Shown instead of the status message when set
    pub error: Option<String>,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        backend_label: String,
        status_message: String,
        error: Option<String>,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            backend_label,
            status_message,
            error,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'_> {
        let mut spans = vec![Span::raw(format!(
            "TrueNotion AI (backend: {})",
            self.backend_label
        ))];

        if let Some(error) = &self.error {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("Error: {error}"),
                Style::default().fg(Color::Red),
            ));
        } else if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }

        if self.has_unseen_content {
            spans.push(Span::styled(" | ↓ New", Style::default().fg(Color::Yellow)));
        }

        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}
