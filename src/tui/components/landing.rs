//! # Landing Page Component
//!
//! Shown while the transcript is empty. Types out the taglines one after
//! another, then reveals the prompt line once a fixed delay has passed since
//! the page was mounted.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const TAGLINES: [&str; 3] = [
    "Agentic RAG with User Defined Context",
    "Fully Customizable Crew AI Agent",
    "Instant Sync with Notion Database",
];

pub const PROMPT_LINE: &str = "Type your query below..";

const TYPE_PER_CHAR: Duration = Duration::from_millis(50);
const DELETE_PER_CHAR: Duration = Duration::from_millis(20);
const HOLD: Duration = Duration::from_millis(2000);
const CURSOR: &str = "|";

/// Reveals something a fixed delay after mount.
///
/// Mounting starts the timer; unmounting cancels it, so a page that goes away
/// and comes back starts over.
#[derive(Debug, Clone)]
pub struct DelayedReveal {
    delay: Duration,
    mounted_at: Option<Instant>,
}

impl DelayedReveal {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            mounted_at: None,
        }
    }

    /// Start the timer. Mounting an already mounted reveal keeps the first
    /// start.
    pub fn mount(&mut self, now: Instant) {
        if self.mounted_at.is_none() {
            self.mounted_at = Some(now);
        }
    }

    pub fn unmount(&mut self) {
        self.mounted_at = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted_at.is_some()
    }

    /// Time since mount, or zero when unmounted.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.mounted_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    pub fn is_revealed(&self, now: Instant) -> bool {
        self.mounted_at.is_some() && self.elapsed(now) >= self.delay
    }

    /// Time since the reveal happened, if it has.
    pub fn since_reveal(&self, now: Instant) -> Option<Duration> {
        self.is_revealed(now)
            .then(|| self.elapsed(now).saturating_sub(self.delay))
    }
}

fn chars_typed(elapsed: Duration, per_char: Duration) -> usize {
    (elapsed.as_millis() / per_char.as_millis()) as usize
}

fn prefix(word: &str, chars: usize) -> String {
    word.chars().take(chars).collect()
}

/// Text of a single word being typed out, `elapsed` after typing started.
pub fn typed_word(word: &str, elapsed: Duration) -> String {
    prefix(word, chars_typed(elapsed, TYPE_PER_CHAR))
}

/// Text of the tagline cycle `elapsed` after the page mounted.
///
/// Each tagline is typed, held, then deleted before the next one starts.
/// The last one stays.
pub fn typed_tagline(elapsed: Duration) -> String {
    let mut remaining = elapsed;
    for (i, word) in TAGLINES.iter().enumerate() {
        let len = word.chars().count() as u32;
        let typing = TYPE_PER_CHAR * len;
        if remaining < typing || i == TAGLINES.len() - 1 {
            return typed_word(word, remaining);
        }
        remaining -= typing;

        if remaining < HOLD {
            return (*word).to_string();
        }
        remaining -= HOLD;

        let deleting = DELETE_PER_CHAR * len;
        if remaining < deleting {
            let deleted = chars_typed(remaining, DELETE_PER_CHAR);
            return prefix(word, len as usize - deleted);
        }
        remaining -= deleting;
    }
    String::new()
}

fn typing_time(word: &str, per_char: Duration) -> Duration {
    per_char * word.chars().count() as u32
}

/// How long the tagline cycle runs before the last tagline stands still.
fn tagline_cycle() -> Duration {
    let last = TAGLINES.len() - 1;
    TAGLINES[..last]
        .iter()
        .map(|word| typing_time(word, TYPE_PER_CHAR) + HOLD + typing_time(word, DELETE_PER_CHAR))
        .sum::<Duration>()
        + typing_time(TAGLINES[last], TYPE_PER_CHAR)
}

/// Welcome content for an empty transcript.
pub struct LandingPage {
    tagline: String,
    prompt: Option<String>,
}

impl LandingPage {
    pub fn new(reveal: &DelayedReveal, now: Instant) -> Self {
        Self {
            tagline: typed_tagline(reveal.elapsed(now)),
            prompt: reveal
                .since_reveal(now)
                .map(|since| typed_word(PROMPT_LINE, since)),
        }
    }

    /// Whether the page still changes on its own. Once the taglines and the
    /// prompt line are fully typed, redraws can wait for input.
    pub fn is_animating(reveal: &DelayedReveal, now: Instant) -> bool {
        if !reveal.is_mounted() {
            return false;
        }
        let elapsed = reveal.elapsed(now);
        let prompt_done = reveal.delay + typing_time(PROMPT_LINE, TYPE_PER_CHAR);
        elapsed < tagline_cycle().max(prompt_done)
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let accent = Style::default().fg(Color::LightBlue);

        let mut lines = vec![
            Line::from(vec![
                Span::styled("True", accent.add_modifier(Modifier::BOLD)),
                Span::styled("Notion AI", accent),
            ]),
            Line::default(),
            Line::from(Span::styled(
                format!("{}{}", self.tagline, CURSOR),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
        ];

        if let Some(prompt) = &self.prompt {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                format!("{prompt}{CURSOR}"),
                Style::default().fg(Color::Gray),
            )));
        }

        let height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center),
            centered,
        );
    }
}
