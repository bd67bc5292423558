#![warn(missing_docs)]
//! GLSL Validator Core - glslangValidator output to editor regions
//!
//! # Overview
//!
//! `glsl-validator-core` is the I/O-free half of the GLSL validator integration. It turns the
//! line-oriented output of `glslangValidator` into region-anchored [`Diagnostic`]s for a given
//! snapshot of the document text.
//!
//! # Pipeline
//!
//! ```text
//! raw output lines ──► DiagnosticParser ──► RawDiagnosticLine (line, token, message)
//!                                                  │
//!                          document text ──► RegionResolver ──► Diagnostic (range, message)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use glsl_validator_core::{DiagnosticParser, DiagnosticRange, RegionResolver};
//!
//! let parser = DiagnosticParser::new().unwrap();
//! let raws = parser.parse_output([
//!     "#### glslangValidator banner",
//!     "ERROR: 0:2: 'foo' : undeclared identifier",
//! ]);
//!
//! let text = "void main() {\n  foo = bar;\n}";
//! let diagnostics = RegionResolver::new(text).resolve_all(&raws);
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].range, DiagnosticRange::new(16, 19));
//! assert_eq!(diagnostics[0].message, "undeclared identifier");
//! ```
//!
//! # Module Description
//!
//! - [`diagnostics`] - Diagnostic data model
//! - [`line_index`] - Rope based line index
//! - [`search`] - Literal search in character offsets
//! - [`parser`] - glslangValidator output parser
//! - [`resolver`] - Finding-to-region resolution
//! - [`document`] - Syntax and shader-stage suffix checks

pub mod diagnostics;
pub mod document;
pub mod line_index;
pub mod parser;
pub mod resolver;
pub mod search;

pub use diagnostics::{Diagnostic, DiagnosticRange};
pub use document::{ShaderStage, UNSUPPORTED_SUFFIX_STATUS, is_glsl_syntax};
pub use line_index::LineIndex;
pub use parser::{DiagnosticParser, OutputLine, RawDiagnosticLine};
pub use resolver::RegionResolver;
pub use search::{SearchError, SearchMatch, find_literal};
