//! One validation pass: run the validator, parse its output, resolve regions.

use crate::error::ValidatorError;
use crate::runner::Validator;
use glsl_validator_core::{Diagnostic, DiagnosticParser, RegionResolver};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A validation pass waiting to run, tagged with the session generation that requested it.
#[derive(Debug, Clone)]
pub struct ValidationJob {
    /// File handed to the validator.
    pub path: PathBuf,
    /// Document text the findings are resolved against.
    pub text: Arc<str>,
    /// Session generation this job belongs to.
    pub generation: u64,
}

/// The result of a [`ValidationJob`].
#[derive(Debug)]
pub struct ValidationOutcome {
    /// File that was validated.
    pub path: PathBuf,
    /// Session generation of the job.
    pub generation: u64,
    /// Resolved diagnostics, or why the run failed.
    pub result: Result<Vec<Diagnostic>, ValidatorError>,
}

/// Validator → parser → resolver.
///
/// Cheap to clone and safe to share between threads; it holds no per-document state.
#[derive(Clone)]
pub struct ValidationPipeline {
    validator: Arc<dyn Validator>,
    parser: DiagnosticParser,
}

impl ValidationPipeline {
    /// Create a pipeline around `validator`.
    pub fn new(validator: Arc<dyn Validator>) -> Result<Self, ValidatorError> {
        Ok(Self {
            validator,
            parser: DiagnosticParser::new()?,
        })
    }

    /// Validate `path` and resolve the findings against `text`.
    pub fn diagnostics_for(
        &self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<Diagnostic>, ValidatorError> {
        let output = self.validator.validate(path)?;
        let raws = self.parser.parse_output(&output.lines);
        Ok(RegionResolver::new(text).resolve_all(&raws))
    }

    /// Execute a job.
    pub fn run(&self, job: ValidationJob) -> ValidationOutcome {
        let result = self.diagnostics_for(&job.path, &job.text);
        ValidationOutcome {
            path: job.path,
            generation: job.generation,
            result,
        }
    }
}
