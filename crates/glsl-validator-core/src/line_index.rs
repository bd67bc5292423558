//! Logical line index over a document snapshot.
//!
//! Uses a Rope so line lookups stay O(log N) even for large shader sources. All offsets are
//! character offsets, matching [`DiagnosticRange`].

use crate::diagnostics::DiagnosticRange;
use ropey::{Rope, RopeSlice};

/// Logical line index - implemented using Rope data structure
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an empty line index (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build line index from text
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Get total line count
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get total character count
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get the region covered by `line`, excluding its line terminator.
    ///
    /// Returns `None` if the line does not exist.
    pub fn line_range(&self, line: usize) -> Option<DiagnosticRange> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let start = self.rope.line_to_char(line);
        let content = content_len(self.rope.line(line));
        Some(DiagnosticRange::new(start, start + content))
    }

    /// Get line number and offset within line from character offset
    pub fn char_offset_to_position(&self, char_offset: usize) -> (usize, usize) {
        let char_offset = char_offset.min(self.rope.len_chars());

        let line_idx = self.rope.char_to_line(char_offset);
        let line_start_char = self.rope.line_to_char(line_idx);

        (line_idx, char_offset - line_start_char)
    }

    /// Get character offset from line number and column number
    pub fn position_to_char_offset(&self, line: usize, column: usize) -> usize {
        match self.line_range(line) {
            Some(range) => range.start + column.min(range.len()),
            None => self.rope.len_chars(),
        }
    }

    /// Get text of the specified line (excluding its line terminator)
    pub fn get_line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let slice = self.rope.line(line);
        Some(slice.slice(..content_len(slice)).to_string())
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

// Rope lines include their terminator. Only `\n`, `\r\n` and `\r` break lines, as in the
// validator's own line count.
fn content_len(line: RopeSlice<'_>) -> usize {
    let mut len = line.len_chars();
    if len == 0 {
        return 0;
    }

    match line.char(len - 1) {
        '\n' => {
            len -= 1;
            if len > 0 && line.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        '\r' => len -= 1,
        _ => {}
    }

    len
}
