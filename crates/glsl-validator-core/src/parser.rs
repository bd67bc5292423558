//! glslangValidator output parsing.
//!
//! The validator prints one finding per line in the form
//! `ERROR: 0:<line>: '<token>' : <message>`, interleaved with `####` banner lines and
//! whatever else the installed tool version decides to print. Anything that is not a
//! finding is skipped, so newer tool versions keep working.

use regex::Regex;

const ERROR_PATTERN: &str = r"^ERROR: 0:(\d+): '([^']*)' : (.*)";
const BANNER_PREFIX: &str = "####";

/// A finding extracted from one line of validator output.
///
/// Only lives between parsing and region resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDiagnosticLine {
    /// Zero-based line index (the tool reports one-based line numbers).
    pub line: usize,
    /// The offending token; may be empty.
    pub token: String,
    /// Free-text message up to the end of the output line.
    pub message: String,
}

/// Classification of a single output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// A `####` banner/comment line.
    Banner,
    /// A finding.
    Error(RawDiagnosticLine),
    /// Anything else.
    Unrecognized,
}

/// Parser for glslangValidator's line-oriented output.
#[derive(Debug, Clone)]
pub struct DiagnosticParser {
    pattern: Regex,
}

impl DiagnosticParser {
    /// Compile the parser.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(ERROR_PATTERN)?,
        })
    }

    /// Classify one output line. A trailing `\n` / `\r\n` is ignored.
    pub fn classify_line(&self, line: &str) -> OutputLine {
        let line = line.trim_end_matches(['\n', '\r']);

        if line.starts_with(BANNER_PREFIX) {
            return OutputLine::Banner;
        }

        let Some(caps) = self.pattern.captures(line) else {
            return OutputLine::Unrecognized;
        };

        // Line 0 (or a number that does not fit) has no zero-based equivalent.
        let Some(line_index) = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
        else {
            tracing::debug!(line, "ignoring finding with unusable line number");
            return OutputLine::Unrecognized;
        };

        OutputLine::Error(RawDiagnosticLine {
            line: line_index,
            token: caps[2].to_string(),
            message: caps[3].to_string(),
        })
    }

    /// Parse validator output into findings, preserving output order.
    pub fn parse_output<I, S>(&self, lines: I) -> Vec<RawDiagnosticLine>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .filter_map(|line| match self.classify_line(line.as_ref()) {
                OutputLine::Error(raw) => Some(raw),
                OutputLine::Banner => None,
                OutputLine::Unrecognized => {
                    tracing::trace!(line = line.as_ref(), "skipping unrecognized output line");
                    None
                }
            })
            .collect()
    }
}
