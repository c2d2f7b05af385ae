//! # InputBox Component
//!
//! Multi-line text field at the bottom of the screen.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste, and explicit newlines (Shift+Enter / Ctrl+J)
//! - Editing and cursor movement over wrapped rows
//! - Emit `Submit` on Enter; the parent decides whether the text was accepted
//!   and calls [`InputBox::clear`] only then
//!
//! ## Module Structure
//!
//! ```text
//! input_box/
//! ├── mod.rs        (component, events, rendering)
//! ├── cursor.rs     (cursor movement and scroll offset)
//! └── text_wrap.rs  (row layout, constants)
//! ```

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::tui::component::{Component, EventHandler, Measure};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, layout_rows, next_char_boundary,
    prev_char_boundary,
};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed on a non-blank buffer. The buffer is left intact.
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

/// Text input component.
///
/// # Props
///
/// - `pending`: a reply is outstanding; shown in the title
pub struct InputBox {
    buffer: String,
    cursor: CursorState,
    pub pending: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: CursorState::new(),
            pending: false,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    fn insert(&mut self, text: &str) -> InputEvent {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
        InputEvent::ContentChanged
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, total_rows: u16) {
        if total_rows <= MAX_VISIBLE_LINES {
            return;
        }
        // content_length is the max scroll position, not the row count
        let mut state = ScrollbarState::default()
            .content_length(usize::from(total_rows - MAX_VISIBLE_LINES))
            .position(usize::from(self.cursor.scroll_offset));
        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut state,
        );
    }
}

impl Measure for InputBox {
    /// Always within `[1, MAX_VISIBLE_LINES]` content rows plus borders.
    fn height(&self, width: u16) -> u16 {
        let rows = layout_rows(self.buffer(), inner_width(width)).len() as u16;
        rows.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_width = area.width;
        let rows = self.cursor.rows(&self.buffer);
        self.cursor.update_scroll_offset(&rows);

        let lines: Vec<Line<'_>> = rows
            .iter()
            .skip(usize::from(self.cursor.scroll_offset))
            .take(usize::from(MAX_VISIBLE_LINES))
            .map(|r| Line::raw(self.buffer[r.start..r.end].to_string()))
            .collect();

        let (title, border_style) = if self.pending {
            (
                " Waiting for TrueNotion... ",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (
                " Ask TrueNotion (Enter to send, Shift+Enter for newline) ",
                Style::default().fg(Color::Green).add_modifier(Modifier::DIM),
            )
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        let input = Paragraph::new(lines)
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);
        self.render_scrollbar(frame, area, rows.len() as u16);

        frame.set_cursor_position(self.cursor.screen_position(&self.buffer, &rows, area));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = |moved: bool| moved.then_some(InputEvent::ContentChanged);
        match event {
            TuiEvent::InputChar(c) => Some(self.insert(c.encode_utf8(&mut [0u8; 4]))),
            TuiEvent::Newline => Some(self.insert("\n")),
            TuiEvent::Paste(text) => {
                // Normalize CRLF from Windows clipboards
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                Some(self.insert(&text))
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => changed(self.cursor.move_left(&self.buffer)),
            TuiEvent::CursorRight => changed(self.cursor.move_right(&self.buffer)),
            TuiEvent::CursorHome => changed(self.cursor.move_home(&self.buffer)),
            TuiEvent::CursorEnd => changed(self.cursor.move_end(&self.buffer)),
            // Unconsumed at the edges, so the transcript can scroll instead
            TuiEvent::CursorUp => changed(self.cursor.move_vertically(&self.buffer, false)),
            TuiEvent::CursorDown => changed(self.cursor.move_vertically(&self.buffer, true)),
            TuiEvent::Submit => (!self.buffer.trim().is_empty())
                .then(|| InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
