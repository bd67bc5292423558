//! Editor-host collaborators.
//!
//! The session never draws or stores anything in the host itself; it pushes state through
//! these traits. Every method is keyed by document path so one host object can serve many
//! documents.

use glsl_validator_core::DiagnosticRange;
use std::path::Path;

/// Draws outlines around diagnostic regions.
pub trait HighlightRenderer {
    /// Replace every outlined region of the document with `regions` (possibly empty).
    fn show_regions(&mut self, path: &Path, regions: &[DiagnosticRange]);
}

/// Shows a single status-bar message per document.
pub trait StatusReporter {
    /// Show `message` for the document.
    fn set_status(&mut self, path: &Path, message: &str);
    /// Remove the document's status message.
    fn erase_status(&mut self, path: &Path);
}

/// Shows blocking notifications.
pub trait UserNotifier {
    /// Show a blocking error message.
    fn error_message(&mut self, message: &str);
}

/// Everything a validation session talks to.
pub trait EditorHost: HighlightRenderer + StatusReporter + UserNotifier {}

impl<T: HighlightRenderer + StatusReporter + UserNotifier> EditorHost for T {}
