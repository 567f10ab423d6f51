//! Text search helpers.
//!
//! Searches run over raw document bytes with `regex::bytes`, so content that is not
//! valid UTF-8 is still searchable. All inputs and outputs are **byte offsets**.
//!
//! - plain substring search (escaped and compiled into a regex)
//! - regex search
//! - optional whole-word matching

use crate::error::Result;
use regex::bytes::{Regex, RegexBuilder};

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (alphanumeric and `_`).
    pub whole_word: bool,
    /// If `true`, treats the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: false,
        }
    }
}

/// A match returned by the search APIs, expressed as a half-open byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start byte offset.
    pub start: usize,
    /// Exclusive end byte offset.
    pub end: usize,
}

impl SearchMatch {
    /// Returns the length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

fn compile_search_regex(query: &str, options: SearchOptions) -> Result<Regex> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };

    Ok(RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()?)
}

fn is_word_byte(byte: u8) -> bool {
    byte == b'_' || byte.is_ascii_alphanumeric() || byte >= 0x80
}

fn is_whole_word(haystack: &[u8], m: SearchMatch) -> bool {
    let before = m
        .start
        .checked_sub(1)
        .and_then(|i| haystack.get(i))
        .copied();
    let after = haystack.get(m.end).copied();

    !before.is_some_and(is_word_byte) && !after.is_some_and(is_word_byte)
}

/// Find the next occurrence of `query` in `haystack`, searching forward from `from`.
///
/// - Returns `Ok(None)` if no match is found (or if `query` is empty).
pub fn find_next(
    haystack: &[u8],
    query: &str,
    options: SearchOptions,
    from: usize,
) -> Result<Option<SearchMatch>> {
    if query.is_empty() {
        return Ok(None);
    }

    let re = compile_search_regex(query, options)?;
    Ok(next_match(&re, haystack, options, from))
}

/// Like [`find_next`], but restarts at offset `0` when nothing matches at or after `from`.
///
/// The pattern is compiled once for both passes.
pub fn find_next_wrapping(
    haystack: &[u8],
    query: &str,
    options: SearchOptions,
    from: usize,
) -> Result<Option<SearchMatch>> {
    if query.is_empty() {
        return Ok(None);
    }

    let re = compile_search_regex(query, options)?;
    Ok(next_match(&re, haystack, options, from).or_else(|| {
        (from > 0)
            .then(|| next_match(&re, haystack, options, 0))
            .flatten()
    }))
}

fn next_match(
    re: &Regex,
    haystack: &[u8],
    options: SearchOptions,
    from: usize,
) -> Option<SearchMatch> {
    let mut start = from.min(haystack.len());
    loop {
        let m = re.find_at(haystack, start)?;
        let candidate = SearchMatch {
            start: m.start(),
            end: m.end(),
        };

        if candidate.is_empty() {
            if candidate.end >= haystack.len() {
                return None;
            }
            start = candidate.end + 1;
            continue;
        }

        if options.whole_word && !is_whole_word(haystack, candidate) {
            start = candidate.start + 1;
            continue;
        }

        return Some(candidate);
    }
}

/// Find all non-overlapping occurrences of `query` in `haystack`.
///
/// - Returns an empty list if `query` is empty.
pub fn find_all(haystack: &[u8], query: &str, options: SearchOptions) -> Result<Vec<SearchMatch>> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let re = compile_search_regex(query, options)?;

    Ok(re
        .find_iter(haystack)
        .map(|m| SearchMatch {
            start: m.start(),
            end: m.end(),
        })
        .filter(|m| !m.is_empty())
        .filter(|m| !options.whole_word || is_whole_word(haystack, *m))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_all_literal() {
        let matches = find_all(b"a.b a.b", "a.b", SearchOptions::default()).unwrap();
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 0, end: 3 },
                SearchMatch { start: 4, end: 7 }
            ]
        );
    }

    #[test]
    fn test_literal_escapes_metacharacters() {
        let matches = find_all(b"axb", "a.b", SearchOptions::default()).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let options = SearchOptions {
            case_sensitive: false,
            ..SearchOptions::default()
        };
        let matches = find_all(b"Foo foo FOO", "foo", options).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_whole_word() {
        let options = SearchOptions {
            whole_word: true,
            ..SearchOptions::default()
        };
        let matches = find_all(b"cat concat cat_ cat.", "cat", options).unwrap();
        assert_eq!(
            matches,
            vec![
                SearchMatch { start: 0, end: 3 },
                SearchMatch { start: 16, end: 19 }
            ]
        );
    }

    #[test]
    fn test_regex_multiline_anchors() {
        let options = SearchOptions {
            regex: true,
            ..SearchOptions::default()
        };
        let matches = find_all(b"ab\nac\nbc", "^a", options).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_find_next_from_offset() {
        let hay = b"one two one";
        let m = find_next(hay, "one", SearchOptions::default(), 1).unwrap();
        assert_eq!(m, Some(SearchMatch { start: 8, end: 11 }));
        let none = find_next(hay, "one", SearchOptions::default(), 9).unwrap();
        assert_eq!(none, None);
    }

    #[test]
    fn test_find_next_wrapping() {
        let hay = b"one two one";
        let options = SearchOptions::default();
        let m = find_next_wrapping(hay, "two", options, 5).unwrap();
        assert_eq!(m, Some(SearchMatch { start: 4, end: 7 }));
        let m = find_next_wrapping(hay, "one", options, 9).unwrap();
        assert_eq!(m, Some(SearchMatch { start: 0, end: 3 }));
        assert_eq!(find_next_wrapping(hay, "zzz", options, 3).unwrap(), None);
    }

    #[test]
    fn test_invalid_regex() {
        let options = SearchOptions {
            regex: true,
            ..SearchOptions::default()
        };
        assert!(find_all(b"abc", "(", options).is_err());
    }

    #[test]
    fn test_non_utf8_haystack() {
        let hay = [0xff, b'a', b'b', 0xfe];
        let matches = find_all(&hay, "ab", SearchOptions::default()).unwrap();
        assert_eq!(matches, vec![SearchMatch { start: 1, end: 3 }]);
    }
}
