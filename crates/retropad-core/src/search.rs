//! Text search helpers.
//!
//! This module provides the find/replace core over a UTF-8 `&str`, using **character offsets**
//! (not byte offsets) for all public inputs/outputs. Queries are always literal:
//!
//! - [`locate`] finds the nearest occurrence from an anchor, in either direction, wrapping
//!   around the buffer boundary
//! - [`find_all`] lists non-overlapping occurrences left to right
//! - [`replace_all`] substitutes every non-overlapping occurrence
//!
//! Case-insensitive matching folds both the buffer and the query with Unicode simple case
//! folding, so returned ranges always index the original text.

use regex::{Match, Regex, RegexBuilder};
use std::borrow::Cow;
use std::collections::TryReserveError;
use thiserror::Error;

/// Direction used by [`locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    /// Towards the start of the buffer.
    Up,
    /// Towards the end of the buffer.
    #[default]
    Down,
}

impl SearchDirection {
    /// Returns the opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Options that control how [`locate`] is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// Scan direction from the anchor.
    pub direction: SearchDirection,
}

impl SearchOptions {
    /// Forward search with the given case sensitivity.
    pub fn down(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            direction: SearchDirection::Down,
        }
    }

    /// Backward search with the given case sensitivity.
    pub fn up(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            direction: SearchDirection::Up,
        }
    }
}

/// A match returned by the search APIs, expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Search errors.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The escaped query could not be compiled (only happens for pathological sizes).
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    /// The replaced buffer could not be allocated. The source text is untouched.
    #[error("not enough memory to build the replaced text: {0}")]
    Allocation(#[from] TryReserveError),
}

/// Result of [`replace_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replaced<'a> {
    /// The rewritten text, borrowed from the input when nothing matched.
    pub text: Cow<'a, str>,
    /// Number of occurrences replaced.
    pub count: usize,
}

#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .cloned()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }

    fn range(&self, m: Match<'_>) -> SearchMatch {
        SearchMatch {
            start: self.byte_to_char(m.start()),
            end: self.byte_to_char(m.end()),
        }
    }
}

fn compile_literal(query: &str, case_sensitive: bool) -> Result<Regex, SearchError> {
    RegexBuilder::new(&regex::escape(query))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(SearchError::InvalidPattern)
}

// Byte offset of the character following the one that starts at `byte`.
fn next_char_boundary(text: &str, byte: usize) -> usize {
    byte + text[byte..].chars().next().map_or(1, char::len_utf8)
}

/// Find the occurrence of `query` nearest to `anchor` in the direction given by `options`.
///
/// - Returns `Ok(None)` if `query` is empty or absent from `text`.
/// - `anchor` is clamped to the text length.
/// - Searching down returns the first match starting at or after `anchor`, wrapping to the
///   first match in the text when there is none.
/// - Searching up returns the match with the largest start strictly before `anchor`
///   (overlapping starts count), wrapping to the last match at or after `anchor`.
pub fn locate(
    text: &str,
    query: &str,
    options: SearchOptions,
    anchor: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(None);
    }

    let re = compile_literal(query, options.case_sensitive)?;
    let index = CharIndex::new(text);
    let anchor = anchor.min(index.char_count());

    let found = match options.direction {
        SearchDirection::Down => locate_down(text, &re, &index, anchor),
        SearchDirection::Up => locate_up(text, &re, &index, anchor),
    };

    Ok(found)
}

fn locate_down(text: &str, re: &Regex, index: &CharIndex, anchor: usize) -> Option<SearchMatch> {
    let from = index.char_to_byte(anchor);
    let found = match re.find_at(text, from) {
        Some(m) => Some(m),
        None if anchor > 0 => re.find(text),
        None => None,
    };
    found.map(|m| index.range(m))
}

fn locate_up(text: &str, re: &Regex, index: &CharIndex, anchor: usize) -> Option<SearchMatch> {
    let anchor_byte = index.char_to_byte(anchor);

    let mut best: Option<Match<'_>> = None;
    let mut pos = 0;
    while let Some(m) = re.find_at(text, pos) {
        if m.start() >= anchor_byte {
            break;
        }
        best = Some(m);
        pos = next_char_boundary(text, m.start());
    }

    if best.is_none() && anchor < index.char_count() {
        let mut pos = anchor_byte;
        while let Some(m) = re.find_at(text, pos) {
            best = Some(m);
            pos = next_char_boundary(text, m.start());
        }
    }

    best.map(|m| index.range(m))
}

/// Find all non-overlapping occurrences of `query` in `text`, left to right.
///
/// - Returns an empty list if `query` is empty.
/// - Match ranges are character offsets and are half-open (`[start, end)`).
pub fn find_all(
    text: &str,
    query: &str,
    case_sensitive: bool,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let re = compile_literal(query, case_sensitive)?;
    let index = CharIndex::new(text);

    Ok(re.find_iter(text).map(|m| index.range(m)).collect())
}

/// Replace every non-overlapping occurrence of `query` in `text` with `replacement`.
///
/// The scan runs left to right and resumes after each replaced span, so `"aa"` occurs twice
/// in `"aaaa"`. Unmatched spans are copied verbatim and `replacement` is inserted literally.
/// When nothing matches (or `query` is empty) the input is returned borrowed with a count of 0.
///
/// # Errors
///
/// Returns [`SearchError::Allocation`] if the output buffer cannot be reserved; no partial
/// result is produced.
pub fn replace_all<'a>(
    text: &'a str,
    query: &str,
    replacement: &str,
    case_sensitive: bool,
) -> Result<Replaced<'a>, SearchError> {
    let unchanged = Replaced {
        text: Cow::Borrowed(text),
        count: 0,
    };
    if query.is_empty() {
        return Ok(unchanged);
    }

    let re = compile_literal(query, case_sensitive)?;
    let spans: Vec<(usize, usize)> = re.find_iter(text).map(|m| (m.start(), m.end())).collect();
    if spans.is_empty() {
        return Ok(unchanged);
    }

    let removed: usize = spans.iter().map(|(start, end)| end - start).sum();
    let capacity = text.len() - removed + spans.len() * replacement.len();

    let mut out = String::new();
    out.try_reserve_exact(capacity)?;

    let mut copied = 0;
    for &(start, end) in &spans {
        out.push_str(&text[copied..start]);
        out.push_str(replacement);
        copied = end;
    }
    out.push_str(&text[copied..]);

    Ok(Replaced {
        text: Cow::Owned(out),
        count: spans.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_index_maps_multibyte_offsets() {
        let text = "aé中b";
        let index = CharIndex::new(text);
        assert_eq!(index.char_count(), 4);
        assert_eq!(index.char_to_byte(2), 3);
        assert_eq!(index.byte_to_char(6), 3);
        assert_eq!(index.char_to_byte(99), text.len());
    }

    #[test]
    fn next_boundary_skips_whole_characters() {
        assert_eq!(next_char_boundary("中a", 0), 3);
        assert_eq!(next_char_boundary("ab", 1), 2);
    }

    #[test]
    fn direction_reverses() {
        assert_eq!(SearchDirection::Down.reversed(), SearchDirection::Up);
        assert_eq!(SearchDirection::Up.reversed(), SearchDirection::Down);
    }
}
