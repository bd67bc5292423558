//! Host platform keys and the bundled validator executable for each.

use crate::error::ValidatorError;

/// A platform the bundled glslangValidator binaries support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// macOS (`osx`).
    Osx,
    /// Linux (`linux`).
    Linux,
    /// Windows (`windows`).
    Windows,
}

impl Platform {
    /// The platform this process is running on.
    pub fn current() -> Result<Self, ValidatorError> {
        if cfg!(target_os = "macos") {
            Ok(Self::Osx)
        } else if cfg!(target_os = "linux") {
            Ok(Self::Linux)
        } else if cfg!(target_os = "windows") {
            Ok(Self::Windows)
        } else {
            Err(ValidatorError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ))
        }
    }

    /// Parse a host platform key (`osx`, `linux`, `windows`).
    pub fn from_key(key: &str) -> Result<Self, ValidatorError> {
        match key {
            "osx" => Ok(Self::Osx),
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            other => Err(ValidatorError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// The host platform key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Osx => "osx",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// File name of the bundled validator, relative to the installation directory.
    ///
    /// macOS ships the same binary name as Linux.
    pub fn executable_name(self) -> &'static str {
        match self {
            Self::Osx | Self::Linux => "glslangValidatorLinux",
            Self::Windows => "glslangValidatorWindows.exe",
        }
    }
}
