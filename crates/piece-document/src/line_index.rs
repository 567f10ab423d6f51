//! Line Start Cache
//!
//! Maintains an array of line start offsets into the logical document for O(1) line
//! count and O(log n) offset-to-line lookup. Edits patch the array in place instead of
//! rescanning the document.

/// Tracks line boundaries of a document.
///
/// `line_starts[0] == 0` always, and every other entry is the byte offset right after
/// a `'\n'`. Entries are strictly increasing. A trailing newline yields a final empty
/// line, so the line count is always the newline count plus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineStarts {
    line_starts: Vec<usize>,
}

impl LineStarts {
    /// Creates a cache describing a single empty line.
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
        }
    }

    /// Rebuilds the cache from the document content, given as chunks in document order.
    ///
    /// This is O(n) in the document size and is only used at construction time.
    pub fn rebuild<'a, I>(&mut self, chunks: I)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        self.line_starts.clear();
        self.line_starts.push(0);

        let mut offset = 0;
        for chunk in chunks {
            for (i, &byte) in chunk.iter().enumerate() {
                if byte == b'\n' {
                    self.line_starts.push(offset + i + 1);
                }
            }
            offset += chunk.len();
        }
    }

    /// Returns the number of lines (at least one).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the offset where `line` starts, or `None` when out of range.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Returns the length of `line`, excluding its trailing newline.
    pub fn line_len(&self, line: usize, total_len: usize) -> Option<usize> {
        let start = self.line_start(line)?;
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => total_len,
        };
        Some(end.saturating_sub(start))
    }

    /// Returns the line containing `offset` (upper-bound search).
    ///
    /// Offsets past the end resolve to the last line.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1)
    }

    /// Converts a document offset into `(line, column)`.
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_at_offset(offset);
        (line, offset - self.line_starts[line])
    }

    /// Patches the cache for `text` inserted at `pos`.
    ///
    /// Cost is proportional to the number of lines after `pos` plus the newlines in `text`.
    pub fn apply_insert(&mut self, pos: usize, text: &[u8]) {
        if text.is_empty() {
            return;
        }

        let line = self.line_at_offset(pos);

        for start in &mut self.line_starts[line + 1..] {
            *start += text.len();
        }

        let new_starts = text
            .iter()
            .enumerate()
            .filter(|&(_, &byte)| byte == b'\n')
            .map(|(i, _)| pos + i + 1);
        self.line_starts.splice(line + 1..line + 1, new_starts);
    }

    /// Patches the cache for the byte range `[pos, pos + count)` being removed.
    ///
    /// Line starts whose newline lies inside the range are dropped, later ones shift left.
    pub fn apply_remove(&mut self, pos: usize, count: usize) {
        if count == 0 {
            return;
        }

        let end = pos + count;
        let first = self.line_starts.partition_point(|&start| start <= pos);
        let last = self.line_starts.partition_point(|&start| start <= end);
        self.line_starts.drain(first..last);

        for start in &mut self.line_starts[first..] {
            *start -= count;
        }
    }

    /// Returns the raw line start array.
    pub fn as_slice(&self) -> &[usize] {
        &self.line_starts
    }
}

impl Default for LineStarts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(text: &str) -> LineStarts {
        let mut index = LineStarts::new();
        index.rebuild([text.as_bytes()]);
        index
    }

    #[test]
    fn test_new_line_index() {
        let index = LineStarts::new();
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.as_slice(), &[0]);
    }

    #[test]
    fn test_rebuild_across_chunks() {
        let mut index = LineStarts::new();
        index.rebuild([b"ab\nc".as_slice(), b"d\n".as_slice(), b"ef".as_slice()]);
        assert_eq!(index.as_slice(), &[0, 3, 6]);
    }

    #[test]
    fn test_trailing_newline_counts_as_line() {
        let index = built("a\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_len(1, 2), Some(0));
    }

    #[test]
    fn test_line_lengths() {
        let index = built("First line\nSecond line\nThird");
        let total = 28;
        assert_eq!(index.line_len(0, total), Some(10));
        assert_eq!(index.line_len(1, total), Some(11));
        assert_eq!(index.line_len(2, total), Some(5));
        assert_eq!(index.line_len(3, total), None);
        assert_eq!(index.line_start(1), Some(11));
        assert_eq!(index.line_start(2), Some(23));
        assert_eq!(index.line_start(3), None);
    }

    #[test]
    fn test_offset_to_line_col() {
        let index = built("ABC\nDEF\nGHI");
        assert_eq!(index.offset_to_line_col(0), (0, 0));
        assert_eq!(index.offset_to_line_col(3), (0, 3));
        assert_eq!(index.offset_to_line_col(4), (1, 0));
        assert_eq!(index.offset_to_line_col(8), (2, 0));
        assert_eq!(index.offset_to_line_col(11), (2, 3));
    }

    #[test]
    fn test_insert_plain_text_shifts_following_lines() {
        let mut index = built("ab\ncd\nef");
        index.apply_insert(1, b"XYZ");
        assert_eq!(index, built("aXYZb\ncd\nef"));
    }

    #[test]
    fn test_insert_with_newlines() {
        let mut index = built("ab\ncd");
        index.apply_insert(4, b"1\n2\n");
        assert_eq!(index, built("ab\nc1\n2\nd"));
    }

    #[test]
    fn test_insert_at_line_start() {
        let mut index = built("ab\ncd");
        index.apply_insert(3, b"\n");
        assert_eq!(index, built("ab\n\ncd"));
    }

    #[test]
    fn test_remove_joins_lines() {
        let mut index = built("ab\ncd\nef");
        index.apply_remove(1, 3);
        assert_eq!(index, built("ad\nef"));
    }

    #[test]
    fn test_remove_multiple_lines() {
        let mut index = built("1\n2\n3\n4\n5");
        index.apply_remove(2, 4);
        assert_eq!(index, built("1\n4\n5"));
    }

    #[test]
    fn test_remove_up_to_newline_keeps_next_start() {
        let mut index = built("abc\ndef");
        index.apply_remove(0, 3);
        assert_eq!(index, built("\ndef"));
    }

    #[test]
    fn test_large_document() {
        let text: String = (0..10_000).map(|i| format!("Line {i}\n")).collect();
        let index = built(&text);
        assert_eq!(index.line_count(), 10_001);
        assert_eq!(index.line_at_offset(text.len()), 10_000);
    }
}
