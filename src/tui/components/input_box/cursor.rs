//! Cursor position tracking and navigation for the InputBox.
//!
//! `CursorState` owns the cursor byte offset, scroll offset, and cached width.
//! Navigation methods take `buffer: &str` explicitly; the text itself is
//! owned by `InputBox`.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use super::text_wrap::{
    CONTENT_OFFSET_X, MAX_VISIBLE_LINES, Row, inner_width, layout_rows, next_char_boundary,
    offset_at_column, prev_char_boundary, row_of,
};

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// Row offset for internal scrolling (0 when content fits in viewport)
    pub scroll_offset: u16,
    /// Area width from last render (used for cursor movement between frames)
    pub last_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_width: Self::DEFAULT_WIDTH,
        }
    }

    /// Back to the start (the buffer was cleared).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    pub fn rows(&self, buffer: &str) -> Vec<Row> {
        layout_rows(buffer, inner_width(self.last_width))
    }

    pub fn move_left(&mut self, buffer: &str) -> bool {
        if self.pos == 0 {
            return false;
        }
        self.pos = prev_char_boundary(buffer, self.pos);
        true
    }

    pub fn move_right(&mut self, buffer: &str) -> bool {
        if self.pos >= buffer.len() {
            return false;
        }
        self.pos = next_char_boundary(buffer, self.pos);
        true
    }

    /// Start of the logical (newline-delimited) line.
    pub fn move_home(&mut self, buffer: &str) -> bool {
        let line_start = buffer[..self.pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let moved = self.pos != line_start;
        self.pos = line_start;
        moved
    }

    /// End of the logical line.
    pub fn move_end(&mut self, buffer: &str) -> bool {
        let line_end = buffer[self.pos..]
            .find('\n')
            .map(|i| self.pos + i)
            .unwrap_or(buffer.len());
        let moved = self.pos != line_end;
        self.pos = line_end;
        moved
    }

    /// Move the cursor one row up or down, keeping its column.
    /// Returns `false` at the first/last row.
    pub fn move_vertically(&mut self, buffer: &str, down: bool) -> bool {
        let rows = self.rows(buffer);
        let current = row_of(&rows, self.pos);
        let target = if down {
            current + 1
        } else {
            match current.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        };
        if target >= rows.len() {
            return false;
        }
        let column = buffer[rows[current].start..self.pos].width();
        self.pos = offset_at_column(buffer, &rows, target, column);
        true
    }

    /// Keep the cursor row inside the visible window.
    pub fn update_scroll_offset(&mut self, rows: &[Row]) {
        let total = rows.len() as u16;
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let cursor_row = row_of(rows, self.pos) as u16;
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = cursor_row + 1 - MAX_VISIBLE_LINES;
        }
        self.scroll_offset = self.scroll_offset.min(total - MAX_VISIBLE_LINES);
    }

    /// Screen position of the cursor inside `area`.
    pub fn screen_position(&self, buffer: &str, rows: &[Row], area: Rect) -> (u16, u16) {
        let row_idx = row_of(rows, self.pos);
        let row = rows.get(row_idx).copied().unwrap_or(Row { start: 0, end: 0 });
        let column = buffer[row.start..self.pos].width() as u16;
        let column = column.min(inner_width(area.width));
        let visible_row = (row_idx as u16).saturating_sub(self.scroll_offset);
        (
            area.x + CONTENT_OFFSET_X + column,
            area.y + 1 + visible_row,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::input_box::text_wrap::HORIZONTAL_OVERHEAD;

    /// Cursor whose rows wrap at `inner` columns.
    fn cursor_at(pos: usize, inner: u16) -> CursorState {
        CursorState {
            pos,
            scroll_offset: 0,
            last_width: inner + HORIZONTAL_OVERHEAD,
        }
    }

    #[test]
    fn test_up_from_long_row_lands_on_shorter_soft_wrapped_row() {
        // Rows: "aaaa " | "bbbbbbbbb"
        let buffer = "aaaa bbbbbbbbb";
        let mut cursor = cursor_at(buffer.len(), 9);

        assert!(cursor.move_vertically(buffer, false));
        let rows = cursor.rows(buffer);
        assert_eq!(row_of(&rows, cursor.pos), 0);
        assert_eq!(cursor.pos, 4);

        // Already on the first row
        assert!(!cursor.move_vertically(buffer, false));
    }

    #[test]
    fn test_down_keeps_column() {
        let buffer = "aaaa bbbbbbbbb";
        let mut cursor = cursor_at(2, 9);
        assert!(cursor.move_vertically(buffer, true));
        assert_eq!(cursor.pos, 7);
        assert!(!cursor.move_vertically(buffer, true));
    }

    #[test]
    fn test_home_end_stay_on_logical_line() {
        let buffer = "one\ntwo";
        let mut cursor = cursor_at(5, 20);
        assert!(cursor.move_home(buffer));
        assert_eq!(cursor.pos, 4);
        assert!(!cursor.move_home(buffer));
        assert!(cursor.move_end(buffer));
        assert_eq!(cursor.pos, buffer.len());
    }

    #[test]
    fn test_scroll_offset_follows_cursor() {
        let buffer = "1\n2\n3\n4\n5\n6\n7";
        let mut cursor = cursor_at(buffer.len(), 20);
        let rows = cursor.rows(buffer);
        cursor.update_scroll_offset(&rows);
        assert_eq!(cursor.scroll_offset, 2);

        cursor.pos = 0;
        cursor.update_scroll_offset(&rows);
        assert_eq!(cursor.scroll_offset, 0);
    }

    #[test]
    fn test_screen_position_accounts_for_border_and_scroll() {
        let buffer = "ab\ncd";
        let cursor = cursor_at(4, 20);
        let rows = cursor.rows(buffer);
        let area = Rect::new(0, 10, 24, 4);
        assert_eq!(cursor.screen_position(buffer, &rows, area), (3, 12));
    }
}
