//! Markdown blocks → ratatui `Text`.
//!
//! Takes the block tree from [`crate::core::markdown`] and lays it out as
//! styled `Line`/`Span` values. Fenced code gets a `╭──`/`╰──` frame and
//! syntect highlighting when the language is known.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::core::markdown::{self, Block, Inline, InlineStyle};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// Parse markdown content into styled `Text` using TrueNotion's color scheme.
///
/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    to_text(&markdown::render(content), base_fg)
}

/// Lay out already-parsed blocks.
pub fn to_text(blocks: &[Block], base_fg: Color) -> Text<'static> {
    let mut w = Writer::new(base_fg);
    w.blocks(blocks);
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Per-line prefix spans (blockquote `│`, code `│`, list indent).
    line_prefixes: Vec<Span<'static>>,
    /// Extra style applied to every inline (quotes are dim italic).
    overlays: Vec<Style>,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            line_prefixes: vec![],
            overlays: vec![],
        }
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_blank(&mut self) {
        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
    }

    fn base_style(&self) -> Style {
        self.overlays
            .iter()
            .fold(Style::default().fg(self.base_fg), |acc, s| acc.patch(*s))
    }

    // ── Blocks ──────────────────────────────────────────────────────────

    fn blocks(&mut self, blocks: &[Block]) {
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                self.push_blank();
            }
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(inlines) => {
                let base = self.base_style();
                self.inlines(inlines, base, None);
            }
            Block::Heading { level, content } => {
                let hs = heading_style(self.base_fg, *level);
                let marker = Span::styled(format!("{} ", "#".repeat(*level as usize)), hs);
                self.inlines(content, hs, Some(marker));
            }
            Block::Code { language, code } => self.code(language.as_deref(), code),
            Block::Quote(inner) => {
                self.line_prefixes
                    .push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                self.overlays
                    .push(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC));
                self.blocks(inner);
                self.overlays.pop();
                self.line_prefixes.pop();
            }
            Block::List { start, items } => self.list(*start, items),
            Block::Rule => {
                self.push_line(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    fn list(&mut self, start: Option<u64>, items: &[Vec<Block>]) {
        let marker_style = Style::default().fg(Color::DarkGray);
        for (n, item) in items.iter().enumerate() {
            let marker = match start {
                None => "- ".to_string(),
                Some(first) => format!("{}. ", first + n as u64),
            };
            let indent = " ".repeat(marker.chars().count());
            let first_line = self.text.lines.len();

            self.line_prefixes.push(Span::raw(indent));
            for (i, block) in item.iter().enumerate() {
                // Tight items: no blank line between the item's own blocks
                if i > 0 && !matches!(block, Block::List { .. }) {
                    self.push_blank();
                }
                self.block(block);
            }
            if self.text.lines.len() == first_line {
                self.push_line(Line::default());
            }
            self.line_prefixes.pop();

            // Swap the indent on the item's first line for its marker
            let depth = self.line_prefixes.len();
            if let Some(line) = self.text.lines.get_mut(first_line)
                && line.spans.len() > depth
            {
                line.spans[depth] = Span::styled(marker, marker_style);
            }
        }
    }

    fn code(&mut self, language: Option<&str>, code: &str) {
        let bs = Style::default().fg(Color::DarkGray);
        let top = match language {
            Some(lang) => Line::from(vec![
                Span::styled("╭── ", bs),
                Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)),
                Span::styled(" ──", bs),
            ]),
            None => Line::from(Span::styled("╭──", bs)),
        };
        self.push_line(top);
        self.line_prefixes.push(Span::styled("│ ", bs));

        let syntax = language.and_then(|lang| SYNTAX_SET.find_syntax_by_token(lang));
        let theme = THEME_SET.themes.get(CODE_THEME);
        match (syntax, theme) {
            (Some(syntax), Some(theme)) => {
                let mut hl = HighlightLines::new(syntax, theme);
                for line in LinesWithEndings::from(code) {
                    let spans: Vec<Span<'static>> = match hl.highlight_line(line, &SYNTAX_SET) {
                        Ok(ranges) => ranges
                            .into_iter()
                            .filter_map(|(hl_style, frag)| {
                                let content = expand_tabs(frag.trim_end_matches('\n'));
                                if content.is_empty() {
                                    return None;
                                }
                                let fg = Color::Rgb(
                                    hl_style.foreground.r,
                                    hl_style.foreground.g,
                                    hl_style.foreground.b,
                                );
                                Some(Span::styled(content, Style::default().fg(fg)))
                            })
                            .collect(),
                        Err(_) => vec![Span::raw(expand_tabs(line.trim_end_matches('\n')))],
                    };
                    self.push_line(Line::from(spans));
                }
            }
            _ => {
                let code_style = Style::default().fg(Color::White);
                for line in code.split('\n') {
                    self.push_line(Line::from(Span::styled(expand_tabs(line), code_style)));
                }
            }
        }

        self.line_prefixes.pop();
        self.push_line(Line::from(Span::styled("╰──", bs)));
    }

    // ── Inlines ─────────────────────────────────────────────────────────

    /// Emit a run of inlines, starting a new line at each hard break.
    fn inlines(&mut self, inlines: &[Inline], base: Style, lead: Option<Span<'static>>) {
        let mut current: Vec<Span<'static>> = lead.into_iter().collect();
        for inline in inlines {
            let style = inline_style(base, &inline.style);
            let mut pieces = inline.text.split('\n');
            if let Some(first) = pieces.next()
                && !first.is_empty()
            {
                current.push(Span::styled(expand_tabs(first), style));
            }
            for piece in pieces {
                self.push_line(Line::from(std::mem::take(&mut current)));
                if !piece.is_empty() {
                    current.push(Span::styled(expand_tabs(piece), style));
                }
            }
            if let Some(url) = &inline.style.link
                && *url != inline.text
            {
                current.push(Span::raw(" ("));
                current.push(Span::styled(url.clone(), link_style()));
                current.push(Span::raw(")"));
            }
        }
        self.push_line(Line::from(current));
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// ratatui renders `\t` as zero-width.
fn expand_tabs(s: &str) -> String {
    s.replace('\t', "    ")
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

fn inline_style(base: Style, style: &InlineStyle) -> Style {
    if style.code {
        return Style::default().fg(Color::White).bg(Color::DarkGray);
    }
    let mut out = base;
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.strikethrough {
        out = out.add_modifier(Modifier::CROSSED_OUT);
    }
    if style.link.is_some() {
        out = out.patch(link_style());
    }
    out
}

fn heading_style(base_fg: Color, level: u8) -> Style {
    match level {
        1 => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        2 => Style::default().fg(base_fg).add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Hello", Color::Blue);
        let line = &text.lines[0];
        assert!(line.spans.len() >= 2, "expected >= 2 spans, got {:?}", line);
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[1].style.fg, Some(Color::Blue));
    }

    #[test]
    fn bold_text_is_bold() {
        let text = render("Some **bold** text", Color::Blue);
        let bold_span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .unwrap();
        assert!(bold_span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn inline_code_styled() {
        let text = render("Use `foo()` here", Color::Blue);
        let code_span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "foo()")
            .unwrap();
        assert_eq!(code_span.style.fg, Some(Color::White));
        assert_eq!(code_span.style.bg, Some(Color::DarkGray));
    }

    #[test]
    fn code_block_has_border_structure() {
        let all = lines_of(&render("```\nline1\nline2\n```", Color::Blue));
        assert!(all[0].starts_with('╭'), "expected top border, got {:?}", all[0]);
        assert_eq!(all[1], "│ line1");
        assert_eq!(all[2], "│ line2");
        assert!(all.last().unwrap().starts_with('╰'));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn one_line_fence_renders_as_framed_block() {
        let all = lines_of(&render("```print(1)```", Color::Blue));
        assert_eq!(all, vec!["╭──", "│ print(1)", "╰──"]);
    }

    #[test]
    fn highlighted_code_keeps_language_label() {
        let all = lines_of(&render("```rust\nfn main() {}\n```", Color::Blue));
        assert!(all[0].contains("rust"));
        assert_eq!(all[1], "│ fn main() {}");
    }

    #[test]
    fn plain_text_uses_base_color() {
        let text = render("hello", Color::Green);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn tabs_expanded_to_spaces() {
        let text = render("```\n\tindented\n```", Color::Blue);
        let all = lines_of(&text);
        assert!(all.iter().any(|l| l.contains("    indented")));
        assert!(!all.iter().any(|l| l.contains('\t')));
    }

    #[test]
    fn paragraphs_are_separated_by_blank_line() {
        let all = lines_of(&render("one\n\ntwo", Color::Blue));
        assert_eq!(all, vec!["one", "", "two"]);
    }

    #[test]
    fn list_items_get_markers() {
        let all = lines_of(&render("- a\n- b", Color::Blue));
        assert_eq!(all, vec!["- a", "- b"]);

        let all = lines_of(&render("3. x\n4. y", Color::Blue));
        assert_eq!(all, vec!["3. x", "4. y"]);
    }

    #[test]
    fn quote_is_prefixed() {
        let all = lines_of(&render("> quoted", Color::Blue));
        assert_eq!(all, vec!["│ quoted"]);
    }

    #[test]
    fn link_url_is_appended() {
        let all = lines_of(&render("[docs](https://example.com)", Color::Blue));
        assert_eq!(all, vec!["docs (https://example.com)"]);
    }
}
