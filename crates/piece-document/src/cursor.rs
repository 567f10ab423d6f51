//! Cursor position and column-sticky navigation.
//!
//! Horizontal movement and edits remember the column the cursor lands on
//! (`desired_column`). Vertical movement reads that column but never changes it, so
//! moving down through a short line and on to a long one returns to the original
//! horizontal target.

use crate::line_index::LineStarts;
use std::cmp::Ordering;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based byte column within the line.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(usize, usize)> for Position {
    fn from((line, column): (usize, usize)) -> Self {
        Self::new(line, column)
    }
}

/// Insertion cursor: a byte offset plus the remembered column for vertical moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
    desired_column: usize,
}

impl Cursor {
    /// Byte offset of the cursor in the document.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Column vertical movement aims for.
    pub fn desired_column(&self) -> usize {
        self.desired_column
    }

    /// Line and column of the cursor.
    pub fn line_col(&self, lines: &LineStarts) -> Position {
        lines.offset_to_line_col(self.position).into()
    }

    /// Place the cursor at `pos` (clamped to `[0, len]`) and remember its column.
    pub fn set(&mut self, pos: usize, lines: &LineStarts, len: usize) {
        self.position = pos.min(len);
        self.sync_desired_column(lines);
    }

    /// Recompute the desired column from the current position.
    pub fn sync_desired_column(&mut self, lines: &LineStarts) {
        self.desired_column = self.line_col(lines).column;
    }

    /// Move one byte left, stopping at the document start.
    pub fn move_left(&mut self, lines: &LineStarts, len: usize) {
        self.set(self.position.saturating_sub(1), lines, len);
    }

    /// Move one byte right, stopping at the document end.
    pub fn move_right(&mut self, lines: &LineStarts, len: usize) {
        self.set(self.position.saturating_add(1), lines, len);
    }

    /// Move to the previous line. No-op on the first line.
    pub fn move_up(&mut self, lines: &LineStarts, len: usize) {
        let line = lines.line_at_offset(self.position);
        if line == 0 {
            return;
        }
        self.move_vertically_to(line - 1, lines, len);
    }

    /// Move to the next line. No-op on the last line.
    pub fn move_down(&mut self, lines: &LineStarts, len: usize) {
        let line = lines.line_at_offset(self.position);
        if line + 1 >= lines.line_count() {
            return;
        }
        self.move_vertically_to(line + 1, lines, len);
    }

    /// Move to the first column of the current line.
    pub fn move_line_start(&mut self, lines: &LineStarts, len: usize) {
        let line = lines.line_at_offset(self.position);
        let start = lines.line_start(line).unwrap_or(0);
        self.set(start, lines, len);
    }

    /// Move past the last character of the current line (before its newline).
    pub fn move_line_end(&mut self, lines: &LineStarts, len: usize) {
        let line = lines.line_at_offset(self.position);
        let start = lines.line_start(line).unwrap_or(0);
        let line_len = lines.line_len(line, len).unwrap_or(0);
        self.set(start + line_len, lines, len);
    }

    /// Adjust for `count` bytes inserted at `pos`. The cursor moves when it is at or after `pos`.
    pub fn on_insert(&mut self, pos: usize, count: usize, lines: &LineStarts) {
        if self.position >= pos {
            self.position += count;
        }
        self.sync_desired_column(lines);
    }

    /// Adjust for the byte range `[pos, pos + count)` being removed.
    pub fn on_remove(&mut self, pos: usize, count: usize, lines: &LineStarts) {
        if self.position >= pos + count {
            self.position -= count;
        } else if self.position > pos {
            self.position = pos;
        }
        self.sync_desired_column(lines);
    }

    fn move_vertically_to(&mut self, target: usize, lines: &LineStarts, len: usize) {
        let (Some(start), Some(line_len)) = (lines.line_start(target), lines.line_len(target, len))
        else {
            return;
        };
        self.position = start + line_len.min(self.desired_column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_of(text: &str) -> (LineStarts, usize) {
        let mut lines = LineStarts::new();
        lines.rebuild([text.as_bytes()]);
        (lines, text.len())
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn test_horizontal_moves_clamp() {
        let (lines, len) = lines_of("ab");
        let mut cursor = Cursor::default();

        cursor.move_left(&lines, len);
        assert_eq!(cursor.position(), 0);

        cursor.move_right(&lines, len);
        cursor.move_right(&lines, len);
        cursor.move_right(&lines, len);
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.desired_column(), 2);
    }

    #[test]
    fn test_vertical_moves_keep_desired_column() {
        let (lines, len) = lines_of("long line\nab\nanother long");
        let mut cursor = Cursor::default();
        cursor.set(7, &lines, len);

        cursor.move_down(&lines, len);
        assert_eq!(cursor.line_col(&lines), Position::new(1, 2));
        assert_eq!(cursor.desired_column(), 7);

        cursor.move_down(&lines, len);
        assert_eq!(cursor.line_col(&lines), Position::new(2, 7));

        cursor.move_up(&lines, len);
        cursor.move_up(&lines, len);
        assert_eq!(cursor.line_col(&lines), Position::new(0, 7));
    }

    #[test]
    fn test_vertical_moves_noop_at_edges() {
        let (lines, len) = lines_of("one\ntwo");
        let mut cursor = Cursor::default();
        cursor.set(1, &lines, len);

        cursor.move_up(&lines, len);
        assert_eq!(cursor.position(), 1);

        cursor.move_down(&lines, len);
        cursor.move_down(&lines, len);
        assert_eq!(cursor.line_col(&lines), Position::new(1, 1));
    }

    #[test]
    fn test_line_start_and_end() {
        let (lines, len) = lines_of("abc\ndefg\n");
        let mut cursor = Cursor::default();
        cursor.set(5, &lines, len);

        cursor.move_line_end(&lines, len);
        assert_eq!(cursor.position(), 8);
        cursor.move_line_start(&lines, len);
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_remove_adjustments() {
        let (lines, _) = lines_of("abcdef");
        let mut cursor = Cursor::default();

        cursor.position = 5;
        cursor.on_remove(1, 2, &lines);
        assert_eq!(cursor.position(), 3);

        cursor.position = 2;
        cursor.on_remove(1, 3, &lines);
        assert_eq!(cursor.position(), 1);

        cursor.position = 1;
        cursor.on_remove(3, 2, &lines);
        assert_eq!(cursor.position(), 1);
    }
}
