//! Pure row layout utilities and dimensional constants for the InputBox.
//!
//! The buffer is laid out into [`Row`]s (byte ranges) once per operation, and
//! both drawing and cursor placement read from the same rows. Words are split
//! with textwrap's `AsciiSpace` separator and placed first-fit; widths come
//! from unicode-width so wide glyphs take two columns.

use textwrap::WordSeparator;
use textwrap::core::{Word, break_words};
use textwrap::wrap_algorithms::wrap_first_fit;
use unicode_width::UnicodeWidthChar;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to first content column (border + padding)
pub(super) const CONTENT_OFFSET_X: u16 = 2;

/// One visual row of the buffer, as a byte range (newline excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Content width inside borders and padding, never zero.
pub(super) fn inner_width(width: u16) -> u16 {
    width.saturating_sub(HORIZONTAL_OVERHEAD).max(1)
}

/// Lay `buffer` out into rows no wider than `width` columns.
pub(super) fn layout_rows(buffer: &str, width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in buffer.split('\n') {
        let words = break_words(WordSeparator::AsciiSpace.find_words(line), width);
        let lines = wrap_first_fit(&words, &[width as f64]);

        let mut start = line_start;
        for words_on_row in &lines {
            let len: usize = words_on_row
                .iter()
                .map(|w: &Word<'_>| w.word.len() + w.whitespace.len())
                .sum();
            rows.push(Row {
                start,
                end: start + len,
            });
            start += len;
        }
        if lines.is_empty() {
            rows.push(Row {
                start: line_start,
                end: line_start,
            });
        }
        line_start += line.len() + 1;
    }
    rows
}

/// Index of the row holding byte offset `pos`.
pub(super) fn row_of(rows: &[Row], pos: usize) -> usize {
    rows.iter().rposition(|r| r.start <= pos).unwrap_or(0)
}

/// Byte offset within `rows[index]` closest to display column `column`.
///
/// The end of a soft-wrapped row is the start of the next one, so the result
/// stops on the row's last character instead.
pub(super) fn offset_at_column(buffer: &str, rows: &[Row], index: usize, column: usize) -> usize {
    let row = rows[index];
    let mut width = 0;
    for (i, c) in buffer[row.start..row.end].char_indices() {
        let w = c.width().unwrap_or(0);
        if width + w > column {
            return row.start + i;
        }
        width += w;
    }

    let soft_wrapped = rows
        .get(index + 1)
        .is_some_and(|next| next.start == row.end);
    if soft_wrapped && row.end > row.start {
        prev_char_boundary(buffer, row.end)
    } else {
        row.end
    }
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_texts(buffer: &str, width: u16) -> Vec<&str> {
        layout_rows(buffer, width)
            .into_iter()
            .map(|r| &buffer[r.start..r.end])
            .collect()
    }

    #[test]
    fn test_layout_rows_wrap_words_and_keep_offsets() {
        assert_eq!(row_texts("hello world", 5), vec!["hello ", "world"]);
        assert_eq!(row_texts("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(row_texts("a\n\nb", 10), vec!["a", "", "b"]);
        assert_eq!(row_texts("", 10), vec![""]);
        assert_eq!(row_texts("x\n", 10), vec!["x", ""]);
    }

    #[test]
    fn test_row_of_prefers_later_row_at_shared_offset() {
        let rows = layout_rows("aaaa bbbbbbbbb", 9);
        assert_eq!(rows, vec![Row { start: 0, end: 5 }, Row { start: 5, end: 14 }]);
        assert_eq!(row_of(&rows, 4), 0);
        assert_eq!(row_of(&rows, 5), 1);
        assert_eq!(row_of(&rows, 14), 1);
    }

    #[test]
    fn test_offset_past_soft_wrapped_row_stays_on_row() {
        let buffer = "aaaa bbbbbbbbb";
        let rows = layout_rows(buffer, 9);
        let offset = offset_at_column(buffer, &rows, 0, 9);
        assert_eq!(offset, 4);
        assert_eq!(row_of(&rows, offset), 0);

        // Broken mid-word: still the last char of the row
        let buffer = "abcdefghij";
        let rows = layout_rows(buffer, 4);
        assert_eq!(offset_at_column(buffer, &rows, 0, 10), 3);
    }

    #[test]
    fn test_offset_past_hard_line_end_is_line_end() {
        let buffer = "ab\ncdef";
        let rows = layout_rows(buffer, 10);
        assert_eq!(offset_at_column(buffer, &rows, 0, 4), 2);
        assert_eq!(offset_at_column(buffer, &rows, 1, 4), 7);
    }

    #[test]
    fn test_offset_counts_wide_glyphs() {
        let buffer = "日本語";
        let rows = layout_rows(buffer, 10);
        assert_eq!(offset_at_column(buffer, &rows, 0, 2), "日".len());
        assert_eq!(offset_at_column(buffer, &rows, 0, 3), "日".len());
    }

    #[test]
    fn test_char_boundaries() {
        assert_eq!(prev_char_boundary("café", 5), 3);
        assert_eq!(next_char_boundary("café", 3), 5);
        assert_eq!(prev_char_boundary("", 0), 0);
        assert_eq!(next_char_boundary("a", 1), 1);
    }
}
