//! Validation diagnostics data model.
//!
//! A [`Diagnostic`] is what a validation pass leaves behind for a document: a region of the
//! document text plus the validator's message. Hosts use it for:
//! - outlining the offending regions
//! - status-bar text for the diagnostic under the caret

/// A character-offset range (`start..end`) in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticRange {
    /// Range start offset (inclusive), in Unicode scalar values (`char`) from the start of the document.
    pub start: usize,
    /// Range end offset (exclusive), in Unicode scalar values (`char`) from the start of the document.
    pub end: usize,
}

impl DiagnosticRange {
    /// Create a new diagnostic range.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty range (a caret) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// Returns the length of the range in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns `true` if `offset` lies within the range.
    ///
    /// Both ends are inclusive, so a caret sitting directly after the last character of a
    /// region still belongs to it.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// Returns `true` if `other` lies entirely within this range (ends inclusive).
    pub fn contains_range(&self, other: DiagnosticRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A single region-anchored validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Region of the document the finding applies to, in character offsets.
    pub range: DiagnosticRange,
    /// Validator message (description only, without the offending token).
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(range: DiagnosticRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}
