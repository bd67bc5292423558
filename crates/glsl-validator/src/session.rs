//! Per-document validation state machine.
//!
//! A [`ValidationSession`] decides whether a host event should trigger a validation pass,
//! hands out [`ValidationJob`]s, and applies their outcomes. Each job carries the generation
//! number the session was at when it was issued; an outcome is only applied while the session
//! is still waiting for that exact generation, so a slow run can never overwrite the results of
//! a newer one, and the diagnostic list only ever changes in one step.

use crate::error::ValidatorError;
use crate::host::EditorHost;
use crate::pipeline::{ValidationJob, ValidationOutcome, ValidationPipeline};
use crate::settings::SettingsStore;
use glsl_validator_core::{
    Diagnostic, DiagnosticRange, ShaderStage, UNSUPPORTED_SUFFIX_STATUS, is_glsl_syntax,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Blocking notification shown when the validator may not be executed.
pub const PERMISSION_DENIED_MESSAGE: &str =
    "GLSLValidator: permission denied to use glslangValidator command";

/// Host lifecycle events that can trigger validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationEvent {
    /// The document was loaded.
    Opened,
    /// The document's view gained focus.
    Activated,
    /// The document was written to disk.
    Saved,
}

/// The document state a trigger is evaluated against.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// File path of the document.
    pub path: PathBuf,
    /// Host syntax name, if the host assigned one.
    pub syntax: Option<String>,
    /// Full document text at the time of the event.
    pub text: Arc<str>,
}

impl DocumentSnapshot {
    /// Create a snapshot without a syntax.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        Self {
            path: path.into(),
            syntax: None,
            text: text.into(),
        }
    }

    /// Set the syntax name.
    pub fn with_syntax(mut self, syntax: impl Into<String>) -> Self {
        self.syntax = Some(syntax.into());
        self
    }
}

/// Whether a validation pass is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No pass outstanding.
    Idle,
    /// Waiting for the outcome of the job with this generation.
    Running {
        /// Generation of the outstanding job.
        generation: u64,
    },
}

/// Why a trigger did not start a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Validation is disabled in the settings; diagnostics were cleared.
    Disabled,
    /// The document is not GLSL; diagnostics were left alone.
    NotGlsl,
    /// The file has no shader-stage suffix; diagnostics were cleared.
    UnsupportedSuffix,
}

/// What [`ValidationSession::handle_event`] decided.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// Run this job and feed its outcome to [`ValidationSession::complete`].
    Run(ValidationJob),
    /// Nothing to run.
    Skipped(SkipReason),
}

impl Dispatch {
    /// The job to run, if any.
    pub fn into_job(self) -> Option<ValidationJob> {
        match self {
            Self::Run(job) => Some(job),
            Self::Skipped(_) => None,
        }
    }
}

/// Validation state for one open document.
#[derive(Debug)]
pub struct ValidationSession {
    path: PathBuf,
    syntax: Option<String>,
    diagnostics: Vec<Diagnostic>,
    state: SessionState,
    next_generation: u64,
}

impl ValidationSession {
    /// Create an idle session with no diagnostics.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            syntax: None,
            diagnostics: Vec::new(),
            state: SessionState::Idle,
            next_generation: 1,
        }
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The syntax seen with the most recent event.
    pub fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The current diagnostic set, in validator output order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// React to a host event.
    ///
    /// Returns [`Dispatch::Run`] when a validation pass is due; the session is then `Running`
    /// until the matching outcome is passed to [`Self::complete`]. A newer trigger supersedes
    /// an outstanding job.
    pub fn handle_event(
        &mut self,
        event: ValidationEvent,
        snapshot: &DocumentSnapshot,
        settings: &dyn SettingsStore,
        host: &mut dyn EditorHost,
    ) -> Dispatch {
        tracing::debug!(?event, path = %snapshot.path.display(), "validation trigger");

        host.erase_status(&self.path);
        self.syntax = snapshot.syntax.clone();

        if !settings.validator_enabled(&snapshot.path) {
            self.clear(host);
            return Dispatch::Skipped(SkipReason::Disabled);
        }

        if !is_glsl_syntax(snapshot.syntax.as_deref()) {
            return Dispatch::Skipped(SkipReason::NotGlsl);
        }

        if ShaderStage::from_path(&snapshot.path).is_none() {
            self.clear(host);
            host.set_status(&self.path, UNSUPPORTED_SUFFIX_STATUS);
            return Dispatch::Skipped(SkipReason::UnsupportedSuffix);
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        if let SessionState::Running { generation: stale } = self.state {
            tracing::debug!(stale, generation, "superseding outstanding validation");
        }
        self.state = SessionState::Running { generation };

        Dispatch::Run(ValidationJob {
            path: snapshot.path.clone(),
            text: Arc::clone(&snapshot.text),
            generation,
        })
    }

    /// Apply the outcome of a job issued by [`Self::handle_event`].
    ///
    /// Returns `false` (and changes nothing) if the outcome is stale: a newer job was issued
    /// since, or the session was cleared meanwhile.
    pub fn complete(&mut self, outcome: ValidationOutcome, host: &mut dyn EditorHost) -> bool {
        match self.state {
            SessionState::Running { generation } if generation == outcome.generation => {}
            state => {
                tracing::debug!(
                    path = %self.path.display(),
                    generation = outcome.generation,
                    ?state,
                    "dropping stale validation outcome"
                );
                return false;
            }
        }
        self.state = SessionState::Idle;

        let diagnostics = match outcome.result {
            Ok(diagnostics) => diagnostics,
            Err(ValidatorError::PermissionDenied) => {
                host.error_message(PERMISSION_DENIED_MESSAGE);
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "validation failed");
                host.set_status(&self.path, &format!("GLSLValidator: {err}"));
                Vec::new()
            }
        };

        self.replace_diagnostics(diagnostics, host);
        true
    }

    /// Handle an event and, if a pass is due, run it on the calling thread.
    ///
    /// Returns the skip reason when no pass ran.
    pub fn validate_now(
        &mut self,
        event: ValidationEvent,
        snapshot: &DocumentSnapshot,
        settings: &dyn SettingsStore,
        pipeline: &ValidationPipeline,
        host: &mut dyn EditorHost,
    ) -> Option<SkipReason> {
        match self.handle_event(event, snapshot, settings, host) {
            Dispatch::Run(job) => {
                let outcome = pipeline.run(job);
                self.complete(outcome, host);
                None
            }
            Dispatch::Skipped(reason) => Some(reason),
        }
    }

    /// Drop all diagnostics (and any outstanding job) and clear the outlines.
    pub fn clear(&mut self, host: &mut dyn EditorHost) {
        self.state = SessionState::Idle;
        self.replace_diagnostics(Vec::new(), host);
    }

    /// The first diagnostic whose region contains `offset`.
    pub fn diagnostic_at(&self, offset: usize) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.range.contains(offset))
    }

    /// The first diagnostic containing any of `selections`, checking selections in order.
    pub fn diagnostic_for_selections(&self, selections: &[DiagnosticRange]) -> Option<&Diagnostic> {
        selections.iter().find_map(|selection| {
            self.diagnostics
                .iter()
                .find(|d| d.range.contains_range(*selection))
        })
    }

    /// Refresh the status text after the selection changed.
    ///
    /// Clears the status, then shows the message of the diagnostic under the selection, if the
    /// document is GLSL and there is one.
    pub fn report_status(&self, selections: &[DiagnosticRange], host: &mut dyn EditorHost) {
        host.erase_status(&self.path);

        if !is_glsl_syntax(self.syntax.as_deref()) {
            return;
        }

        if let Some(diagnostic) = self.diagnostic_for_selections(selections) {
            host.set_status(&self.path, &diagnostic.message);
        }
    }

    fn replace_diagnostics(&mut self, diagnostics: Vec<Diagnostic>, host: &mut dyn EditorHost) {
        self.diagnostics = diagnostics;
        let regions: Vec<DiagnosticRange> = self.diagnostics.iter().map(|d| d.range).collect();
        host.show_regions(&self.path, &regions);
    }
}
