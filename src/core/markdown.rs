//! Markdown → display blocks.
//!
//! Thin wrapper around `pulldown_cmark` that folds its event stream into an
//! ordered list of [`Block`]s. Knows nothing about the terminal; the TUI turns
//! blocks into styled lines.
//!
//! Two overrides on top of CommonMark:
//! - fenced code is kept verbatim in a single [`Block::Code`]
//! - a triple-backtick span written on one line (`` ```x``` ``) is a one-line
//!   fence, so it becomes a code block too instead of inline code

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    Code { language: Option<String>, code: String },
    Quote(Vec<Block>),
    /// `start` is `Some(n)` for ordered lists.
    List { start: Option<u64>, items: Vec<Vec<Block>> },
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inline {
    pub text: String,
    pub style: InlineStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

/// Plain text of a run of inlines.
pub fn plain_text(inlines: &[Inline]) -> String {
    inlines.iter().map(|i| i.text.as_str()).collect()
}

/// Parse `content` into blocks. Never fails; malformed input degrades to
/// whatever pulldown-cmark makes of it.
pub fn render(content: &str) -> Vec<Block> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(content);
    for (event, range) in Parser::new_ext(content, opts).into_offset_iter() {
        w.handle(event, range);
    }
    w.finish()
}

// ── Writer ──────────────────────────────────────────────────────────────────

/// The leaf block currently collecting content.
enum Leaf {
    Paragraph,
    Heading(u8),
    Code { language: Option<String>, code: String },
}

/// Open container blocks, innermost last.
enum Container {
    Quote(Vec<Block>),
    List { start: Option<u64>, items: Vec<Vec<Block>> },
    Item(Vec<Block>),
}

struct Writer<'s> {
    source: &'s str,
    blocks: Vec<Block>,
    containers: Vec<Container>,
    leaf: Option<Leaf>,
    inlines: Vec<Inline>,
    /// Inline style stack. Styles compose so nested bold+italic works.
    styles: Vec<InlineStyle>,
}

impl<'s> Writer<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            blocks: vec![],
            containers: vec![],
            leaf: None,
            inlines: vec![],
            styles: vec![],
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_leaf();
        while let Some(container) = self.containers.pop() {
            self.close_container(container);
        }
        self.blocks
    }

    // ── Style helpers ───────────────────────────────────────────────────

    fn style(&self) -> InlineStyle {
        self.styles.last().cloned().unwrap_or_default()
    }

    fn push_style(&mut self, overlay: impl FnOnce(&mut InlineStyle)) {
        let mut style = self.style();
        overlay(&mut style);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Block helpers ───────────────────────────────────────────────────

    fn push_block(&mut self, block: Block) {
        match self.containers.last_mut() {
            Some(Container::Quote(blocks)) | Some(Container::Item(blocks)) => blocks.push(block),
            // Lists only hold items; anything else lands at the top level.
            Some(Container::List { .. }) | None => self.blocks.push(block),
        }
    }

    /// Close the current leaf and emit it, dropping blank paragraphs.
    fn flush_leaf(&mut self) {
        let inlines = std::mem::take(&mut self.inlines);
        let Some(leaf) = self.leaf.take() else {
            return;
        };
        let blank = inlines.iter().all(|i| i.text.trim().is_empty());
        match leaf {
            Leaf::Paragraph if !blank => self.push_block(Block::Paragraph(inlines)),
            Leaf::Heading(level) if !blank => self.push_block(Block::Heading {
                level,
                content: inlines,
            }),
            Leaf::Code { language, mut code } => {
                if code.ends_with('\n') {
                    code.pop();
                }
                self.push_block(Block::Code { language, code });
            }
            _ => {}
        }
    }

    fn close_container(&mut self, container: Container) {
        match container {
            Container::Quote(blocks) => self.push_block(Block::Quote(blocks)),
            Container::List { start, items } => self.push_block(Block::List { start, items }),
            Container::Item(blocks) => match self.containers.last_mut() {
                Some(Container::List { items, .. }) => items.push(blocks),
                _ => {
                    for block in blocks {
                        self.push_block(block);
                    }
                }
            },
        }
    }

    /// Tight list items deliver text without a paragraph start.
    fn ensure_inline_leaf(&mut self) {
        if self.leaf.is_none() {
            self.leaf = Some(Leaf::Paragraph);
        }
    }

    fn push_inline(&mut self, text: &str, style: InlineStyle) {
        if text.is_empty() {
            return;
        }
        self.ensure_inline_leaf();
        if let Some(last) = self.inlines.last_mut()
            && last.style == style
        {
            last.text.push_str(text);
            return;
        }
        self.inlines.push(Inline {
            text: text.to_owned(),
            style,
        });
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c, range),
            Event::Html(h) | Event::InlineHtml(h) => {
                let style = self.style();
                self.push_inline(h.trim_end_matches('\n'), style);
            }
            Event::SoftBreak => {
                let style = self.style();
                self.push_inline(" ", style);
            }
            Event::HardBreak => {
                let style = self.style();
                self.push_inline("\n", style);
            }
            Event::Rule => {
                self.flush_leaf();
                self.push_block(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_inline(marker, InlineStyle::default());
            }
            _ => {} // footnotes, math
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            // ── Block elements ──────────────────────────────────────────
            Tag::Paragraph | Tag::HtmlBlock => {
                self.flush_leaf();
                self.leaf = Some(Leaf::Paragraph);
            }
            Tag::Heading { level, .. } => {
                self.flush_leaf();
                self.leaf = Some(Leaf::Heading(heading_depth(level)));
            }
            Tag::CodeBlock(kind) => {
                self.flush_leaf();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.leaf = Some(Leaf::Code {
                    language,
                    code: String::new(),
                });
            }
            Tag::BlockQuote(_) => {
                self.flush_leaf();
                self.containers.push(Container::Quote(vec![]));
            }
            Tag::List(start) => {
                self.flush_leaf();
                self.containers.push(Container::List {
                    start,
                    items: vec![],
                });
            }
            Tag::Item => {
                self.flush_leaf();
                self.containers.push(Container::Item(vec![]));
            }

            // ── Inline elements ─────────────────────────────────────────
            Tag::Emphasis => self.push_style(|s| s.italic = true),
            Tag::Strong => self.push_style(|s| s.bold = true),
            Tag::Strikethrough => self.push_style(|s| s.strikethrough = true),
            Tag::Link { dest_url, .. } => {
                let url = dest_url.to_string();
                self.push_style(|s| s.link = Some(url));
            }
            _ => {} // tables, images, footnote definitions
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::HtmlBlock | TagEnd::Heading(_) | TagEnd::CodeBlock => {
                self.flush_leaf()
            }
            TagEnd::BlockQuote(_) | TagEnd::List(_) | TagEnd::Item => {
                self.flush_leaf();
                if let Some(container) = self.containers.pop() {
                    self.close_container(container);
                }
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style()
            }
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        if let Some(Leaf::Code { code, .. }) = self.leaf.as_mut() {
            code.push_str(&cow);
            return;
        }
        let style = self.style();
        self.push_inline(&cow, style);
    }

    fn inline_code(&mut self, cow: CowStr<'_>, range: Range<usize>) {
        let one_line_fence = self
            .source
            .get(range)
            .is_some_and(|raw| raw.starts_with("```"));

        if !one_line_fence {
            let mut style = self.style();
            style.code = true;
            self.push_inline(&cow, style);
            return;
        }

        // Split the surrounding leaf around the promoted code block.
        let resume = match self.leaf {
            Some(Leaf::Heading(level)) => Leaf::Heading(level),
            _ => Leaf::Paragraph,
        };
        self.flush_leaf();
        self.push_block(Block::Code {
            language: None,
            code: cow.into_string(),
        });
        self.leaf = Some(resume);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
