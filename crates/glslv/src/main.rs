//! glslv - validate GLSL shader files with glslangValidator from the command line.
//!
//! Each file argument is treated like a document opened in an editor: it goes through the same
//! session logic, and the findings are printed as `path:line:col: error: message`.

use anyhow::{Context, Result, bail};
use glsl_validator::{
    Dispatch, DocumentSnapshot, HighlightRenderer, SessionRegistry, SkipReason, StatusReporter,
    UserNotifier, ValidationEvent, ValidationPipeline, ValidationWorker, ValidatorSettings,
};
use glsl_validator_core::{DiagnosticRange, LineIndex};
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_SYNTAX: &str = "GLSL.sublime-syntax";

const USAGE: &str = "\
Usage: glslv [OPTIONS] <FILE>...

Options:
  --install-dir <DIR>   Directory holding the bundled glslangValidator (default: next to glslv)
  --settings <FILE>     Settings file (glslvalidator_enabled, glslvalidator_timeout_ms, ...)
  --syntax <NAME>       Syntax name to report for every file (default: GLSL.sublime-syntax)
  -h, --help            Print this help";

#[derive(Debug)]
struct Options {
    install_dir: Option<PathBuf>,
    settings: Option<PathBuf>,
    syntax: String,
    files: Vec<PathBuf>,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Option<Self>> {
        let mut options = Options {
            install_dir: None,
            settings: None,
            syntax: DEFAULT_SYNTAX.to_string(),
            files: Vec::new(),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--install-dir" => options.install_dir = Some(value(&mut args, &arg)?.into()),
                "--settings" => options.settings = Some(value(&mut args, &arg)?.into()),
                "--syntax" => options.syntax = value(&mut args, &arg)?,
                flag if flag.starts_with("--") => bail!("unknown option: {flag}"),
                file => options.files.push(PathBuf::from(file)),
            }
        }

        if options.files.is_empty() {
            bail!("no input files\n\n{USAGE}");
        }
        Ok(Some(options))
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next().with_context(|| format!("{flag} expects a value"))
}

/// Prints host notifications to stderr and remembers what a shell exit code needs.
#[derive(Default)]
struct TerminalHost {
    regions: HashMap<PathBuf, Vec<DiagnosticRange>>,
    failed: bool,
}

impl HighlightRenderer for TerminalHost {
    fn show_regions(&mut self, path: &Path, regions: &[DiagnosticRange]) {
        self.regions.insert(path.to_path_buf(), regions.to_vec());
    }
}

impl StatusReporter for TerminalHost {
    fn set_status(&mut self, path: &Path, message: &str) {
        eprintln!("{}: {message}", path.display());
        if message.starts_with("GLSLValidator:") {
            self.failed = true;
        }
    }

    fn erase_status(&mut self, _path: &Path) {}
}

impl UserNotifier for TerminalHost {
    fn error_message(&mut self, message: &str) {
        eprintln!("error: {message}");
        self.failed = true;
    }
}

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("glslv: {err:#}");
            process::exit(2);
        }
    }
}

/// Returns `Ok(true)` when every file validated cleanly.
fn run() -> Result<bool> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("glslv=info".parse()?))
        .init();

    let Some(options) = Options::parse(env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(true);
    };

    let settings = match &options.settings {
        Some(path) => ValidatorSettings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => ValidatorSettings::default(),
    };

    let install_dir = match options.install_dir.clone() {
        Some(dir) => dir,
        None => default_install_dir()?,
    };
    let install = settings
        .install(&install_dir)
        .context("Failed to locate glslangValidator")?;
    tracing::info!(executable = %install.executable().display(), "using validator");

    let runner = settings.runner(Arc::new(install));
    let pipeline = ValidationPipeline::new(Arc::new(runner))?;
    let mut worker = ValidationWorker::new(pipeline);
    let mut registry = SessionRegistry::new();
    let mut host = TerminalHost::default();

    let mut documents = Vec::new();
    for (file, path) in unique_inputs(&options.files)? {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot = DocumentSnapshot::new(&path, text).with_syntax(options.syntax.clone());

        match registry.handle_event(ValidationEvent::Opened, &snapshot, &settings, &mut host) {
            Dispatch::Run(job) => worker.submit(job)?,
            Dispatch::Skipped(SkipReason::Disabled) => {
                tracing::info!(path = %path.display(), "validation disabled");
            }
            Dispatch::Skipped(SkipReason::NotGlsl) => {
                tracing::info!(
                    path = %path.display(),
                    syntax = %options.syntax,
                    "not a GLSL document, skipping"
                );
            }
            Dispatch::Skipped(SkipReason::UnsupportedSuffix) => host.failed = true,
        }
        documents.push((file, snapshot));
    }

    // The runner kills the validator at its timeout, so every outcome arrives well before this.
    let patience = settings.timeout + Duration::from_secs(5);
    while worker.in_flight() > 0 {
        let Some(outcome) = worker.recv_timeout(patience) else {
            bail!("validation did not report back within {patience:?}");
        };
        registry.complete(outcome, &mut host);
    }

    let mut clean = !host.failed;
    for (display_path, snapshot) in &documents {
        let Some(session) = registry.session(&snapshot.path) else {
            continue;
        };
        let lines = LineIndex::from_text(&snapshot.text);
        for diagnostic in session.diagnostics() {
            let (line, column) = lines.char_offset_to_position(diagnostic.range.start);
            println!(
                "{}:{}:{}: error: {}",
                display_path.display(),
                line + 1,
                column + 1,
                diagnostic.message
            );
            clean = false;
        }
    }

    tracing::debug!(
        documents = documents.len(),
        outlined = host.regions.values().map(Vec::len).sum::<usize>(),
        "done"
    );
    Ok(clean)
}

/// Pairs each file argument with its canonical path, keeping the first of any duplicates.
fn unique_inputs(files: &[PathBuf]) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut seen = HashSet::new();
    let mut inputs = Vec::new();
    for file in files {
        let path = fs::canonicalize(file)
            .with_context(|| format!("Failed to open {}", file.display()))?;
        if seen.insert(path.clone()) {
            inputs.push((file.clone(), path));
        } else {
            tracing::debug!(path = %path.display(), "skipping duplicate file argument");
        }
    }
    Ok(inputs)
}

fn default_install_dir() -> Result<PathBuf> {
    let exe = env::current_exe().context("Failed to locate the glslv executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("glslv executable has no parent directory")
}
