use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::Role;
use crate::tui::component::{Component, Measure};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Animated dots cycle for the typing indicator.
const DOT_FRAMES: [&str; 4] = ["", ".", "..", "..."];

pub fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

/// A single conversation turn, drawn as a rounded bubble titled with the
/// speaker.
///
/// `Message` is a transient component: built fresh for each visible item
/// from the parts the transcript view hands out. Every part goes through the
/// Markdown renderer; consecutive parts are separated by a blank line.
#[derive(Clone)]
pub struct Message {
    pub role: Role,
    body: Text<'static>,
}

impl Message {
    pub fn new(role: Role, parts: &[&str]) -> Self {
        let fg = role_style(role).fg.unwrap_or(Color::Reset);
        let mut body = Text::default();
        for part in parts {
            let rendered = markdown::render(part, fg);
            if rendered.lines.is_empty() {
                continue;
            }
            if !body.lines.is_empty() {
                body.lines.push(Line::default());
            }
            body.lines.extend(rendered.lines);
        }
        Self { role, body }
    }

    fn paragraph(&self) -> Paragraph<'_> {
        // No trimming: code blocks depend on leading whitespace
        Paragraph::new(self.body.clone())
            .style(role_style(self.role))
            .wrap(Wrap { trim: false })
    }
}

impl Measure for Message {
    /// Height including borders, as the paragraph will wrap at `width`.
    fn height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding; still occupy a row.
            return 1;
        }
        let lines = self.paragraph().line_count(content_width).max(1);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD)
    }
}

impl Widget for Message {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = role_style(self.role);
        let border_style = style.add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(self.role.label())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);
        self.paragraph().render(inner_area, buf);
    }
}

impl Component for Message {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.clone(), area);
    }
}

/// The "assistant is typing" bubble shown after the newest turn while a
/// reply is outstanding.
#[derive(Clone, Copy)]
pub struct LoadingIndicator {
    /// Animation tick; advances the dots.
    pub frame: usize,
}

impl LoadingIndicator {
    pub const HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;

    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    fn label(&self) -> String {
        format!("thinking{}", DOT_FRAMES[self.frame % DOT_FRAMES.len()])
    }
}

impl Measure for LoadingIndicator {
    fn height(&self, _width: u16) -> u16 {
        Self::HEIGHT
    }
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = role_style(Role::Assistant);
        let block = Block::bordered()
            .title(Role::Assistant.label())
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .title_style(style.add_modifier(Modifier::DIM))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        Paragraph::new(self.label())
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
            .block(block)
            .render(area, buf);
    }
}
