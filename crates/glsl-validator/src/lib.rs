#![warn(missing_docs)]
//! `glsl-validator` - glslangValidator integration for editor hosts.
//!
//! This crate runs the external `glslangValidator` executable, turns its output into
//! region-anchored diagnostics (via `glsl-validator-core`), and keeps one diagnostic set per
//! open document, pushing full replacements to the host's collaborators.
//!
//! ```text
//! host event ──► SessionRegistry ──► ValidationSession::handle_event ──► ValidationJob
//!                                                                            │
//!                     ValidationWorker (background thread) ◄─────────────────┘
//!                                 │  ProcessRunner → DiagnosticParser → RegionResolver
//!                                 ▼
//!                        ValidationOutcome ──► ValidationSession::complete ──► EditorHost
//! ```

pub mod error;
pub mod host;
pub mod pipeline;
pub mod platform;
pub mod registry;
pub mod runner;
pub mod session;
pub mod settings;
pub mod worker;

pub use error::ValidatorError;
pub use host::{EditorHost, HighlightRenderer, StatusReporter, UserNotifier};
pub use pipeline::{ValidationJob, ValidationOutcome, ValidationPipeline};
pub use platform::Platform;
pub use registry::SessionRegistry;
pub use runner::{
    DEFAULT_TIMEOUT, ProcessRunner, RawOutput, Validator, ValidatorInstall, is_permission_denied,
};
pub use session::{
    Dispatch, DocumentSnapshot, PERMISSION_DENIED_MESSAGE, SessionState, SkipReason,
    ValidationEvent, ValidationSession,
};
pub use settings::{SettingsStore, ValidatorSettings};
pub use worker::ValidationWorker;
