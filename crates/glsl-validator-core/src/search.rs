//! Literal text search in character offsets.
//!
//! The query is escaped and compiled into a regex, so no character in it has a special
//! meaning. All public inputs/outputs are **character offsets** (not byte offsets).

use regex::Regex;
use thiserror::Error;

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
    /// The escaped query failed to compile (e.g. it exceeds the regex size limit).
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[derive(Debug)]
struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) => idx,
            Err(idx) => idx,
        }
    }
}

/// Find the first occurrence of `needle` in `text` that starts at or after `from_char`.
///
/// - Returns `Ok(None)` if no match is found (or if `needle` is empty).
/// - The search is case-sensitive and runs to the end of `text`.
pub fn find_literal(
    text: &str,
    needle: &str,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    if needle.is_empty() {
        return Ok(None);
    }

    let re = Regex::new(&regex::escape(needle))?;
    let index = CharIndex::new(text);

    let start_byte = index.char_to_byte(from_char);
    let Some(m) = re.find_at(text, start_byte) else {
        return Ok(None);
    };

    Ok(Some(SearchMatch {
        start: index.byte_to_char(m.start()),
        end: index.byte_to_char(m.end()),
    }))
}
