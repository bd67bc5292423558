//! Mapping parsed findings onto regions of the document text.

use crate::diagnostics::{Diagnostic, DiagnosticRange};
use crate::line_index::LineIndex;
use crate::parser::RawDiagnosticLine;
use crate::search::find_literal;

/// Resolves [`RawDiagnosticLine`]s against one snapshot of the document text.
///
/// Build one resolver per validation pass; the line index is computed once and shared by every
/// finding in the batch.
pub struct RegionResolver<'a> {
    text: &'a str,
    lines: LineIndex,
}

impl<'a> RegionResolver<'a> {
    /// Create a resolver for `text`.
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: LineIndex::from_text(text),
        }
    }

    /// The line index of the snapshot.
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Resolve a single finding.
    ///
    /// The region is the first literal occurrence of the token at or after the start of the
    /// reported line, or the whole line when the token is empty or cannot be found. Returns
    /// `None` when the reported line does not exist in this snapshot.
    pub fn resolve(&self, raw: &RawDiagnosticLine) -> Option<Diagnostic> {
        let line_range = self.lines.line_range(raw.line)?;

        let mut range = line_range;
        if !raw.token.is_empty() {
            match find_literal(self.text, &raw.token, line_range.start) {
                Ok(Some(m)) if !m.is_empty() => range = DiagnosticRange::new(m.start, m.end),
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(%err, token = %raw.token, "token search failed, using line");
                }
            }
        }

        Some(Diagnostic::new(range, raw.message.clone()))
    }

    /// Resolve a batch, dropping findings whose line is out of range.
    pub fn resolve_all(&self, raws: &[RawDiagnosticLine]) -> Vec<Diagnostic> {
        raws.iter()
            .filter_map(|raw| {
                let resolved = self.resolve(raw);
                if resolved.is_none() {
                    tracing::debug!(
                        line = raw.line,
                        line_count = self.lines.line_count(),
                        "dropping diagnostic outside the document"
                    );
                }
                resolved
            })
            .collect()
    }
}
