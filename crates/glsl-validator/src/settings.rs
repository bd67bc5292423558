//! Validator settings.
//!
//! Settings come from a `.sublime-settings`-style JSON object. Every key is optional; a key
//! that is absent or `null` keeps its default.
//!
//! ```json
//! {
//!     // 0/1 or false/true
//!     "glslvalidator_enabled": 1,
//!     "glslvalidator_timeout_ms": 10000,
//!     "glslvalidator_executable": "/opt/glslang/bin/glslangValidator"
//! }
//! ```

use crate::error::ValidatorError;
use crate::runner::{DEFAULT_TIMEOUT, ProcessRunner, ValidatorInstall};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Read-only access to the per-document enablement flag.
pub trait SettingsStore {
    /// Whether validation is enabled for the document at `path`.
    fn validator_enabled(&self, path: &Path) -> bool;
}

/// Effective validator settings (defaults overlaid with user values).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorSettings {
    /// Whether validation runs at all.
    pub enabled: bool,
    /// Bound on a single validator run.
    pub timeout: Duration,
    /// Explicit validator executable, replacing the bundled per-platform binary.
    pub executable: Option<PathBuf>,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: DEFAULT_TIMEOUT,
            executable: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct UserSettings {
    glslvalidator_enabled: Option<Flag>,
    glslvalidator_timeout_ms: Option<u64>,
    glslvalidator_executable: Option<PathBuf>,
}

impl ValidatorSettings {
    /// Parse user settings and overlay them on the defaults.
    ///
    /// Whole-line `//` comments are allowed, as in Sublime settings files.
    pub fn from_json_str(json: &str) -> Result<Self, ValidatorError> {
        let stripped = strip_line_comments(json);
        let user: UserSettings = serde_json::from_str(&stripped)?;

        let mut settings = Self::default();
        if let Some(flag) = user.glslvalidator_enabled {
            settings.enabled = flag.is_set();
        }
        if let Some(ms) = user.glslvalidator_timeout_ms {
            settings.timeout = Duration::from_millis(ms);
        }
        if let Some(executable) = user.glslvalidator_executable {
            settings.executable = Some(executable);
        }
        Ok(settings)
    }

    /// Load user settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ValidatorError> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json_str(&json),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Build the installation state for `dir`, honouring an explicit executable.
    pub fn install(&self, dir: impl Into<PathBuf>) -> Result<ValidatorInstall, ValidatorError> {
        match &self.executable {
            Some(executable) => Ok(ValidatorInstall::with_executable(dir, executable.clone())),
            None => ValidatorInstall::for_current_platform(dir),
        }
    }

    /// Build a runner using these settings' timeout.
    pub fn runner(&self, install: Arc<ValidatorInstall>) -> ProcessRunner {
        ProcessRunner::new(install).with_timeout(self.timeout)
    }
}

impl SettingsStore for ValidatorSettings {
    fn validator_enabled(&self, _path: &Path) -> bool {
        self.enabled
    }
}

fn strip_line_comments(json: &str) -> String {
    json.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}
