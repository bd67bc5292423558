//! Running the external glslangValidator executable.
//!
//! This module stays runtime-agnostic (no async runtime required). The child's stdout and
//! stderr share one pipe, so the line stream keeps the order in which the tool wrote it; a
//! reader thread feeds that stream into a channel and lets the caller bound the wait.

use crate::error::ValidatorError;
use crate::platform::Platform;
use std::fs;
use std::io::{self, BufRead, BufReader, PipeReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command as ProcessCommand, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

/// Default bound on a single validator run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured validator output: merged stdout/stderr, one entry per line (terminator stripped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    /// Output lines in the order they were read.
    pub lines: Vec<String>,
}

impl From<Vec<String>> for RawOutput {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

/// Something that can validate a shader file on disk and return the tool's raw output.
pub trait Validator: Send + Sync {
    /// Validate `file` and return the raw output lines.
    fn validate(&self, file: &Path) -> Result<RawOutput, ValidatorError>;
}

/// Process-wide validator installation state.
///
/// Create one per process and share it (via `Arc`) between every [`ProcessRunner`]; the
/// executable-permission fix it guards runs at most once for the lifetime of the value.
#[derive(Debug)]
pub struct ValidatorInstall {
    dir: PathBuf,
    executable: PathBuf,
    permissions_checked: OnceLock<()>,
}

impl ValidatorInstall {
    /// Installation rooted at `dir`, using the bundled executable for `platform`.
    pub fn new(dir: impl Into<PathBuf>, platform: Platform) -> Self {
        let dir = dir.into();
        let executable = dir.join(platform.executable_name());
        Self::with_executable(dir, executable)
    }

    /// Installation rooted at `dir` for the running platform.
    ///
    /// Fails with [`ValidatorError::UnsupportedPlatform`] on platforms without a bundled binary.
    pub fn for_current_platform(dir: impl Into<PathBuf>) -> Result<Self, ValidatorError> {
        Ok(Self::new(dir, Platform::current()?))
    }

    /// Installation rooted at `dir` using an explicit executable path.
    ///
    /// Relative paths are resolved against the current working directory now, since the
    /// validator itself runs with `dir` as its working directory.
    pub fn with_executable(dir: impl Into<PathBuf>, executable: impl Into<PathBuf>) -> Self {
        Self {
            dir: absolute(dir.into()),
            executable: absolute(executable.into()),
            permissions_checked: OnceLock::new(),
        }
    }

    /// The working directory validator runs use.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The validator executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Whether the executable-permission fix has already run.
    pub fn permissions_checked(&self) -> bool {
        self.permissions_checked.get().is_some()
    }

    /// Make sure the executable carries the "executable" permission bit.
    ///
    /// Only the first call does any work; concurrent first calls wait for it. Returns `true`
    /// for the call that performed the fix. A failed fix is logged, not reported: the following
    /// launch surfaces the real problem.
    pub fn ensure_executable(&self) -> bool {
        let mut performed = false;
        self.permissions_checked.get_or_init(|| {
            performed = true;
            if let Err(err) = set_executable_bit(&self.executable) {
                tracing::warn!(
                    executable = %self.executable.display(),
                    %err,
                    "could not mark validator as executable"
                );
            }
        });
        performed
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

#[cfg(unix)]
fn set_executable_bit(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn set_executable_bit(path: &Path) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}

/// Runs `<executable> <file>` from the installation directory and captures its output.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    install: Arc<ValidatorInstall>,
    timeout: Duration,
}

impl ProcessRunner {
    /// Create a runner with the [`DEFAULT_TIMEOUT`].
    pub fn new(install: Arc<ValidatorInstall>) -> Self {
        Self {
            install,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the bound on a single run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The shared installation state.
    pub fn install(&self) -> &Arc<ValidatorInstall> {
        &self.install
    }

    /// The bound on a single run.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run the validator against `file`.
    ///
    /// Any output line containing "permission denied" (case-insensitive) turns the whole run
    /// into [`ValidatorError::PermissionDenied`], as does the OS refusing to execute the binary.
    /// A run that outlives the timeout is killed and reported as [`ValidatorError::Timeout`].
    pub fn run(&self, file: &Path) -> Result<RawOutput, ValidatorError> {
        self.install.ensure_executable();

        // The child runs from the install dir; a relative file must still mean the caller's.
        let file = std::path::absolute(file)?;
        let executable = self.install.executable();
        let (reader, writer) = io::pipe()?;
        let mut child = ProcessCommand::new(executable)
            .arg(&file)
            .current_dir(self.install.dir())
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .spawn()
            .map_err(|source| spawn_error(executable, source))?;

        let deadline = Instant::now() + self.timeout;
        let Ok(lines) = collect_output(reader, deadline) else {
            kill_child(&mut child);
            tracing::warn!(
                file = %file.display(),
                timeout = ?self.timeout,
                "validator timed out"
            );
            return Err(ValidatorError::Timeout(self.timeout));
        };

        if lines.iter().any(|line| is_permission_denied(line)) {
            kill_child(&mut child);
            return Err(ValidatorError::PermissionDenied);
        }

        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill_child(&mut child);
                return Err(ValidatorError::Timeout(self.timeout));
            }
            Err(err) => return Err(ValidatorError::Io(err)),
        };

        if status.code().is_none() {
            return Err(ValidatorError::Terminated(status));
        }

        tracing::debug!(
            file = %file.display(),
            %status,
            lines = lines.len(),
            "validator finished"
        );
        Ok(RawOutput { lines })
    }
}

impl Validator for ProcessRunner {
    fn validate(&self, file: &Path) -> Result<RawOutput, ValidatorError> {
        self.run(file)
    }
}

/// Returns `true` if a validator output line reports a permission problem.
pub fn is_permission_denied(line: &str) -> bool {
    line.to_ascii_lowercase().contains("permission denied")
}

fn spawn_error(executable: &Path, source: io::Error) -> ValidatorError {
    if source.kind() == io::ErrorKind::PermissionDenied {
        ValidatorError::PermissionDenied
    } else {
        ValidatorError::Spawn {
            path: executable.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug)]
enum OutputEvent {
    Line(String),
    Closed(io::Result<()>),
}

struct CollectTimeout;

// The command (and with it the parent's copies of the write end) is dropped once the child is
// spawned, so the stream ends when the child and anything it started have exited.
fn collect_output(reader: PipeReader, deadline: Instant) -> Result<Vec<String>, CollectTimeout> {
    let (tx, rx) = mpsc::channel::<OutputEvent>();
    thread::spawn(move || read_lines(reader, tx));

    let mut lines = Vec::new();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(OutputEvent::Line(line)) => lines.push(line),
            Ok(OutputEvent::Closed(result)) => {
                if let Err(err) = result {
                    tracing::warn!(%err, "error reading validator output");
                }
                break;
            }
            Err(RecvTimeoutError::Timeout) => return Err(CollectTimeout),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(lines)
}

fn read_lines(stream: PipeReader, tx: mpsc::Sender<OutputEvent>) {
    let reader = BufReader::new(stream);
    for chunk in reader.split(b'\n') {
        match chunk {
            Ok(bytes) => {
                let line = String::from_utf8_lossy(&bytes);
                let line = line.strip_suffix('\r').unwrap_or(line.as_ref()).to_string();
                if tx.send(OutputEvent::Line(line)).is_err() {
                    return;
                }
            }
            Err(err) => {
                let _ = tx.send(OutputEvent::Closed(Err(err)));
                return;
            }
        }
    }
    let _ = tx.send(OutputEvent::Closed(Ok(())));
}

fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(EXIT_POLL_INTERVAL);
    }
}

fn kill_child(child: &mut Child) {
    if let Err(err) = child.kill() {
        tracing::debug!(%err, "failed to kill validator");
    }
    let _ = child.wait();
}
