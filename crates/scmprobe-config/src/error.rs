//! Error types for configuration management.

// False positive warnings from thiserror macro expansion
#![allow(unused_assignments)]

use crate::validate::{MAX_TRUNK_DEPTH, MIN_TRUNK_DEPTH};
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// What is wrong with a configured client binary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolProblem {
    /// Blank or whitespace only.
    #[error("binary name is empty")]
    Empty,
    /// Contains a newline, NUL or similar.
    #[error("binary name contains control characters")]
    ControlCharacters,
}

/// Configuration error type with rich diagnostics.
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    /// A config file layer points at nothing.
    #[error("scmprobe config file not found: {path}")]
    #[diagnostic(
        code(scmprobe::config::missing_file),
        help("drop the file layer to run on defaults and SCMPROBE_* variables")
    )]
    MissingFile {
        /// Path that was not found.
        path: PathBuf,
    },

    /// The config file is not valid JSON for [`crate::ScmConfig`].
    #[error("cannot parse {path}: {message}")]
    #[diagnostic(
        code(scmprobe::config::json),
        help("see line {line}, column {column}; keys are kebab-case, e.g. \"max-trunk-depth\"")
    )]
    Json {
        /// File path.
        path: PathBuf,
        /// Parser message.
        message: String,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
    },

    /// A `tools.*` entry cannot name a client binary.
    #[error("{field}: {problem}")]
    #[diagnostic(
        code(scmprobe::config::tool),
        help("use a command name found on PATH (\"svn\") or an absolute path to the client")
    )]
    BadTool {
        /// Field name, e.g. `tools.svn`.
        field: String,
        /// What is wrong with it.
        problem: ToolProblem,
    },

    /// Trunk search bound outside the accepted range.
    #[error("max-trunk-depth {value} is outside {}..={}", MIN_TRUNK_DEPTH, MAX_TRUNK_DEPTH)]
    #[diagnostic(
        code(scmprobe::config::trunk_depth),
        help("each step descends one directory while looking for trunk; 32 covers real layouts")
    )]
    TrunkDepth {
        /// Configured bound.
        value: usize,
    },

    /// An `SCMPROBE_*` variable holds something unusable.
    #[error("{var}: expected {expected}, got '{found}'")]
    #[diagnostic(
        code(scmprobe::config::env),
        help("fix or unset {var} to fall back to the file and defaults")
    )]
    BadEnvVar {
        /// Variable name.
        var: &'static str,
        /// Accepted form.
        expected: &'static str,
        /// Value as set.
        found: String,
    },

    /// Reading the config file failed.
    #[error("cannot read {path}: {message}")]
    #[diagnostic(code(scmprobe::config::read))]
    Unreadable {
        /// File path.
        path: PathBuf,
        /// OS error text.
        message: String,
    },

    /// The config file exists but may not be read.
    #[error("permission denied reading {path}")]
    #[diagnostic(code(scmprobe::config::permission_denied))]
    PermissionDenied {
        /// File path.
        path: PathBuf,
    },
}

impl ConfigError {
    /// Classify a failure to read the config file at `path`.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::MissingFile { path },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Unreadable {
                path,
                message: err.to_string(),
            },
        }
    }

    /// Wrap a JSON parse failure with its position.
    #[must_use]
    pub fn json(path: impl Into<PathBuf>, err: &sonic_rs::Error) -> Self {
        Self::Json {
            path: path.into(),
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }

    /// Unusable `tools.*` entry.
    #[must_use]
    pub fn bad_tool(field: impl Into<String>, problem: ToolProblem) -> Self {
        Self::BadTool {
            field: field.into(),
            problem,
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_classified() {
        let err = ConfigError::read(
            "/nope/scmprobe.json",
            &std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn trunk_depth_message() {
        let err = ConfigError::TrunkDepth { value: 0 };
        assert_eq!(err.to_string(), "max-trunk-depth 0 is outside 1..=256");
    }

    #[test]
    fn tool_message_names_field() {
        let err = ConfigError::bad_tool("tools.hg", ToolProblem::ControlCharacters);
        assert_eq!(
            err.to_string(),
            "tools.hg: binary name contains control characters"
        );
    }
}
