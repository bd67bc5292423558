//! Document eligibility checks: syntax and shader-stage file suffix.

use std::fmt;
use std::path::Path;

/// Status text shown when a GLSL document has no recognized shader-stage suffix.
pub const UNSUPPORTED_SUFFIX_STATUS: &str =
    "File name must end in .frag, .vert, .geom, .tesc, .tese or .comp";

/// Shader stage, identified by the file suffix glslangValidator expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// `.vert`
    Vertex,
    /// `.tesc`
    TessControl,
    /// `.tese`
    TessEvaluation,
    /// `.geom`
    Geometry,
    /// `.frag`
    Fragment,
    /// `.comp`
    Compute,
}

impl ShaderStage {
    /// All stages, in pipeline order.
    pub const ALL: [ShaderStage; 6] = [
        Self::Vertex,
        Self::TessControl,
        Self::TessEvaluation,
        Self::Geometry,
        Self::Fragment,
        Self::Compute,
    ];

    /// The file suffix (without the dot).
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Vertex => "vert",
            Self::TessControl => "tesc",
            Self::TessEvaluation => "tese",
            Self::Geometry => "geom",
            Self::Fragment => "frag",
            Self::Compute => "comp",
        }
    }

    /// Look up a stage by suffix (case-sensitive, without the dot).
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.suffix() == suffix)
    }

    /// Determine the stage from a file name, e.g. `shaders/blur.frag`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str().and_then(Self::from_suffix)
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Returns `true` if a host syntax name denotes GLSL (case-insensitive `GLSL` substring).
///
/// Hosts usually hand over a syntax definition path such as
/// `Packages/OpenGL Shading Language (GLSL)/GLSL.sublime-syntax`.
pub fn is_glsl_syntax(syntax: Option<&str>) -> bool {
    syntax.is_some_and(|syntax| syntax.to_ascii_lowercase().contains("glsl"))
}
