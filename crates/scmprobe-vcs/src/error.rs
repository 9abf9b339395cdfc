//! VCS error types with enough context to tell "missing" from "broken".

use crate::url::UrlRejection;
use thiserror::Error;

/// VCS-specific error types with detailed context.
#[derive(Error, Debug)]
pub enum VcsError {
    /// SVN operation failed.
    #[error("svn error: {message}")]
    Svn {
        /// Error message.
        message: String,
    },

    /// Mercurial operation failed.
    #[error("mercurial error: {message}")]
    Mercurial {
        /// Error message.
        message: String,
    },

    /// CVS operation failed.
    #[error("cvs error: {message}")]
    Cvs {
        /// Error message.
        message: String,
    },

    /// Authentication failed.
    #[error("authentication failed for {url}: {reason}")]
    AuthenticationFailed {
        /// Repository URL.
        url: String,
        /// Failure reason.
        reason: String,
    },

    /// Repository or path not found on the server.
    #[error("repository not found: {url}")]
    RepositoryNotFound {
        /// Repository URL.
        url: String,
    },

    /// URL rejected by validation.
    #[error("invalid vcs url '{url}': {reason}")]
    InvalidUrl {
        /// The invalid URL.
        url: String,
        /// Why it was rejected.
        #[source]
        reason: UrlRejection,
    },

    /// CVSROOT string could not be understood.
    #[error("invalid cvs root '{root}': {reason}")]
    InvalidCvsRoot {
        /// The offending root.
        root: String,
        /// Failure reason.
        reason: String,
    },

    /// A field expected in command output was missing.
    #[error("field '{field}' not found in {command} output")]
    FieldNotFound {
        /// Field name, e.g. `Repository Root`.
        field: String,
        /// Command whose output was parsed.
        command: String,
    },

    /// Command exited with a non-zero status.
    #[error("command '{command}' failed: {message}")]
    Command {
        /// Command that failed.
        command: String,
        /// Captured error text.
        message: String,
        /// Exit code if available.
        exit_code: Option<i32>,
    },

    /// VCS tool not available.
    #[error("{tool} is not installed or not in PATH")]
    ToolNotAvailable {
        /// Program name.
        tool: String,
    },

    /// IO error while spawning or talking to a child process.
    #[error("io error running {command}: {message}")]
    Io {
        /// Command being run.
        command: String,
        /// Error message.
        message: String,
    },
}

impl VcsError {
    /// Create an SVN error from a message.
    #[must_use]
    pub fn svn(message: impl Into<String>) -> Self {
        Self::Svn {
            message: message.into(),
        }
    }

    /// Create an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: UrlRejection) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason,
        }
    }

    /// Create a field-not-found error.
    #[must_use]
    pub fn field_not_found(field: impl Into<String>, command: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
            command: command.into(),
        }
    }

    /// Raw error text carried by the failure, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Svn { message }
            | Self::Mercurial { message }
            | Self::Cvs { message }
            | Self::Command { message, .. }
            | Self::Io { message, .. } => Some(message),
            Self::AuthenticationFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// Check if this is a "not found" error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::RepositoryNotFound { .. })
    }

    /// Check if this is an authentication error.
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }
}

/// Result type for VCS operations.
pub type Result<T> = std::result::Result<T, VcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_exposes_raw_text() {
        let err = VcsError::Command {
            command: "svn info".to_string(),
            message: "svn: E170000: path not found".to_string(),
            exit_code: Some(1),
        };
        assert_eq!(err.message(), Some("svn: E170000: path not found"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn invalid_url_display() {
        let err = VcsError::invalid_url("foo", UrlRejection::MissingProtocol);
        assert!(err.to_string().starts_with("invalid vcs url 'foo'"));
    }
}
