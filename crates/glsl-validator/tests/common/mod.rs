#![allow(dead_code)]

use glsl_validator::{
    HighlightRenderer, RawOutput, SettingsStore, StatusReporter, UserNotifier, Validator,
    ValidatorError,
};
use glsl_validator_core::DiagnosticRange;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const GLSL_SYNTAX: &str = "Packages/OpenGL Shading Language (GLSL)/GLSL.sublime-syntax";

pub const DOC: &str = "void main() {\n  foo = bar;\n}";

#[derive(Debug, Clone)]
pub enum Behavior {
    Output(Vec<String>),
    PermissionDenied,
    Timeout,
}

/// A validator that replays a fixed behaviour and counts its calls.
pub struct FakeValidator {
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
}

impl FakeValidator {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_output(lines: &[&str]) -> Self {
        Self::new(Behavior::Output(
            lines.iter().map(|line| line.to_string()).collect(),
        ))
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Validator for FakeValidator {
    fn validate(&self, _file: &Path) -> Result<RawOutput, ValidatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.behavior.lock().unwrap() {
            Behavior::Output(lines) => Ok(RawOutput::from(lines.clone())),
            Behavior::PermissionDenied => Err(ValidatorError::PermissionDenied),
            Behavior::Timeout => Err(ValidatorError::Timeout(Duration::from_millis(5))),
        }
    }
}

pub struct Enabled(pub bool);

impl SettingsStore for Enabled {
    fn validator_enabled(&self, _path: &Path) -> bool {
        self.0
    }
}

/// Records everything the session pushes to the host.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub regions: HashMap<PathBuf, Vec<DiagnosticRange>>,
    pub region_pushes: usize,
    pub status: HashMap<PathBuf, String>,
    pub errors: Vec<String>,
}

impl RecordingHost {
    pub fn regions_for(&self, path: &str) -> Option<&[DiagnosticRange]> {
        self.regions.get(Path::new(path)).map(Vec::as_slice)
    }

    pub fn status_for(&self, path: &str) -> Option<&str> {
        self.status.get(Path::new(path)).map(String::as_str)
    }
}

impl HighlightRenderer for RecordingHost {
    fn show_regions(&mut self, path: &Path, regions: &[DiagnosticRange]) {
        self.region_pushes += 1;
        self.regions.insert(path.to_path_buf(), regions.to_vec());
    }
}

impl StatusReporter for RecordingHost {
    fn set_status(&mut self, path: &Path, message: &str) {
        self.status.insert(path.to_path_buf(), message.to_string());
    }

    fn erase_status(&mut self, path: &Path) {
        self.status.remove(path);
    }
}

impl UserNotifier for RecordingHost {
    fn error_message(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
