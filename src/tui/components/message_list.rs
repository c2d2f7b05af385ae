//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Draw every [`RenderItem`] the transcript view produces, in order
//! - Own scrolling, including stick-to-bottom while replies stream in
//! - Cache item heights so only what changed is re-measured
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the render items (props).
//!
//! ## Layout cache
//!
//! Heights are keyed by the store's replacement epoch and the content width.
//! Within one epoch the transcript only grows, and only its last message is
//! ever amended in place, so everything before the last message item can be
//! reused. An unchanged store revision reuses everything.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::view::RenderItem;
use crate::tui::component::{Component, EventHandler, Measure};
use crate::tui::components::message::{LoadingIndicator, Message};
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Content exists below the viewport
    pub has_unseen_content: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true, // Start attached to bottom
            viewport_height: 0,
            has_unseen_content: false,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Jump to the newest turn and follow it. Called when a send is accepted.
    pub fn pin_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.scroll_to_bottom();
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub items: &'a [RenderItem<'a>],
    /// Store replacement epoch (see `MessageStore::epoch`)
    pub epoch: u64,
    /// Store revision (see `MessageStore::revision`)
    pub revision: u64,
    /// Animation tick for the loading indicator
    pub tick: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        items: &'a [RenderItem<'a>],
        epoch: u64,
        revision: u64,
        tick: usize,
    ) -> Self {
        Self {
            state,
            items,
            epoch,
            revision,
            tick,
        }
    }
}

fn item_height(item: &RenderItem<'_>, width: u16) -> u16 {
    match item {
        RenderItem::Message { role, parts, .. } => Message::new(*role, parts).height(width),
        RenderItem::LoadingIndicator => LoadingIndicator::HEIGHT,
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let key = CacheKey {
            epoch: self.epoch,
            width: content_width,
        };

        // 1. Update Layout Cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(key, self.revision, self.items);
        layout.heights.truncate(reusable);
        for item in self.items.iter().skip(layout.heights.len()) {
            layout.heights.push(item_height(item, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.remember(key, self.revision);

        let total_height = layout.total_height();

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible items into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let top = self.state.layout.top_of(i);
            let rect = Rect::new(0, top, content_width, height);
            match &self.items[i] {
                RenderItem::Message { role, parts, .. } => {
                    scroll_view.render_widget(Message::new(*role, parts), rect);
                }
                RenderItem::LoadingIndicator => {
                    scroll_view.render_widget(LoadingIndicator::new(self.tick), rect);
                }
            }
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let max_y = total_height.saturating_sub(area.height);
        self.state.has_unseen_content =
            !self.state.stick_to_bottom && self.state.scroll_state.offset().y < max_y;
    }
}

/// Implemented on the persistent state: `MessageList` is rebuilt every
/// frame and can't hold scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                Some(())
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                Some(())
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                Some(())
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                Some(())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheKey {
    pub epoch: u64,
    pub width: u16,
}

/// Cached layout measurements
#[derive(Debug, Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    /// Running bottom edge of each item.
    pub prefix_heights: Vec<u16>,
    key: Option<CacheKey>,
    revision: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many leading cached heights are still valid for `items`.
    pub fn reusable_count(&self, key: CacheKey, revision: u64, items: &[RenderItem<'_>]) -> usize {
        if self.key != Some(key) {
            return 0;
        }
        if self.revision == revision && self.heights.len() == items.len() {
            return items.len();
        }
        // The last message may have been amended; the indicator is cheap.
        let last_message = items
            .iter()
            .rposition(|item| matches!(item, RenderItem::Message { .. }))
            .unwrap_or(0);
        self.heights.len().min(last_message)
    }

    pub fn remember(&mut self, key: CacheKey, revision: u64) {
        self.key = Some(key);
        self.revision = revision;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top edge of item `index`.
    pub fn top_of(&self, index: usize) -> u16 {
        index
            .checked_sub(1)
            .and_then(|i| self.prefix_heights.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Items intersecting the viewport, padded by half a screen each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
