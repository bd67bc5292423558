//! Error types for running the validator and loading its settings.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while running glslangValidator or loading its configuration.
pub enum ValidatorError {
    #[error("permission denied to use glslangValidator command")]
    /// The OS or the tool refused to execute the validator.
    PermissionDenied,

    #[error("unsupported platform: {0}")]
    /// No validator executable is known for this platform.
    UnsupportedPlatform(String),

    #[error("glslangValidator did not finish within {0:?}")]
    /// The validator process was killed after exceeding the configured wait.
    Timeout(Duration),

    #[error("failed to start glslangValidator at {path}: {source}")]
    /// The validator executable could not be started (missing, not a binary, ...).
    Spawn {
        /// The executable that was launched.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    #[error("glslangValidator terminated unexpectedly ({0})")]
    /// The validator ended without an exit code (e.g. killed by a signal).
    Terminated(ExitStatus),

    #[error("I/O error: {0}")]
    /// Filesystem or pipe I/O failed.
    Io(#[from] io::Error),

    #[error("settings parse error: {0}")]
    /// The settings file is not valid JSON or has mistyped values.
    Settings(#[from] serde_json::Error),

    #[error("diagnostic pattern error: {0}")]
    /// The output parser failed to compile.
    Pattern(#[from] regex::Error),
}
