//! Sessions for all open documents.

use crate::host::EditorHost;
use crate::pipeline::ValidationOutcome;
use crate::session::{Dispatch, DocumentSnapshot, ValidationEvent, ValidationSession};
use crate::settings::SettingsStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Owns one [`ValidationSession`] per open document, keyed by path.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<PathBuf, ValidationSession>,
}

impl SessionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a host event to the document's session, creating it on first use.
    pub fn handle_event(
        &mut self,
        event: ValidationEvent,
        snapshot: &DocumentSnapshot,
        settings: &dyn SettingsStore,
        host: &mut dyn EditorHost,
    ) -> Dispatch {
        self.sessions
            .entry(snapshot.path.clone())
            .or_insert_with(|| ValidationSession::new(snapshot.path.clone()))
            .handle_event(event, snapshot, settings, host)
    }

    /// Route an outcome to its session. Outcomes for closed documents are dropped.
    pub fn complete(&mut self, outcome: ValidationOutcome, host: &mut dyn EditorHost) -> bool {
        match self.sessions.get_mut(&outcome.path) {
            Some(session) => session.complete(outcome, host),
            None => {
                tracing::debug!(
                    path = %outcome.path.display(),
                    "dropping outcome for closed document"
                );
                false
            }
        }
    }

    /// The session for `path`, if the document has one.
    pub fn session(&self, path: &Path) -> Option<&ValidationSession> {
        self.sessions.get(path)
    }

    /// Destroy the session of a closed document.
    pub fn close(&mut self, path: &Path) -> Option<ValidationSession> {
        self.sessions.remove(path)
    }

    /// Number of tracked documents.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no document is tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Iterate over all sessions (in no particular order).
    pub fn sessions(&self) -> impl Iterator<Item = &ValidationSession> {
        self.sessions.values()
    }
}
