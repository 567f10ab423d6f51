//! Terminal cell width helpers for presentation layers.

use unicode_width::UnicodeWidthChar;

/// Calculate visual width of a character
pub fn char_width(ch: char) -> usize {
    // Use unicode-width crate to implement UAX #11
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Calculate visual width (in cells) for a character at a specific cell offset within the line.
///
/// `'\t'` advances to the next tab stop based on `tab_width`.
pub fn cell_width_at(ch: char, cell_offset_in_line: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - cell_offset_in_line % tab_width
    } else {
        char_width(ch)
    }
}

/// Cell offset reached after laying out `line` from the start of the line.
///
/// Invalid UTF-8 sequences count as one replacement character each.
pub fn display_width(line: &[u8], tab_width: usize) -> usize {
    String::from_utf8_lossy(line)
        .chars()
        .fold(0usize, |x, ch| x.saturating_add(cell_width_at(ch, x, tab_width)))
}
