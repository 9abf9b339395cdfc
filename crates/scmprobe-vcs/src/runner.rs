//! Command execution seam.
//!
//! Every adapter talks to its VCS client through [`CommandRunner`], so the
//! parsing and resolution logic can be exercised against canned output.

use crate::error::{Result, VcsError};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, trace};

/// A program plus its arguments. No shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Program to execute.
    pub program: String,
    /// Arguments, passed verbatim.
    pub args: Vec<String>,
    /// Working directory, if it matters.
    pub current_dir: Option<PathBuf>,
}

impl CommandLine {
    /// Start a command line.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run from a specific directory.
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Short name used in error messages, e.g. `svn info`.
    #[must_use]
    pub fn label(&self) -> String {
        let sub = self.args.iter().find(|a| !a.starts_with('-'));
        match sub {
            Some(sub) => format!("{} {sub}", self.program),
            None => self.program.clone(),
        }
    }

    /// Whether any argument contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.args.iter().any(|a| a.contains(needle))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.starts_with("--password") {
                f.write_str(" --password=***")?;
            } else if arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Executes command lines and hands back their standard output.
pub trait CommandRunner: Send + Sync + fmt::Debug {
    /// Run `command` to completion.
    ///
    /// # Errors
    /// Fails with the captured error text when the command exits non-zero or
    /// cannot be started.
    fn run(&self, command: &CommandLine) -> Result<String>;
}

/// Runs commands as child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a process runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Check whether `program` can be started at all.
    #[must_use]
    pub fn is_available(program: &str) -> bool {
        Command::new(program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &CommandLine) -> Result<String> {
        debug!(command = %command, "running");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(ref dir) = command.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VcsError::ToolNotAvailable {
                    tool: command.program.clone(),
                }
            } else {
                VcsError::Io {
                    command: command.label(),
                    message: e.to_string(),
                }
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::Command {
                command: command.label(),
                message: stderr.trim_end().to_string(),
                exit_code: output.status.code(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        trace!(bytes = stdout.len(), "command output");
        Ok(stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_masks_password() {
        let cmd = CommandLine::new("svn")
            .arg("info")
            .arg("--username=robin")
            .arg("--password=secret")
            .arg("http://svn.example.org/a b");
        let shown = cmd.to_string();
        assert!(!shown.contains("secret"));
        assert!(shown.contains("--password=***"));
        assert!(shown.ends_with("'http://svn.example.org/a b'"));
    }

    #[test]
    fn label_skips_flags() {
        let cmd = CommandLine::new("svn").args(["ls", "-r", "HEAD"]);
        assert_eq!(cmd.label(), "svn ls");
    }

    #[test]
    fn missing_tool() {
        let err = ProcessRunner::new()
            .run(&CommandLine::new("scmprobe-no-such-binary").arg("info"))
            .unwrap_err();
        assert!(matches!(err, VcsError::ToolNotAvailable { .. }));
    }
}
