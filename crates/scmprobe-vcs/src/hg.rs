//! Mercurial (hg) file access via command-line.

use crate::error::{Result, VcsError};
use crate::runner::{CommandLine, CommandRunner};
use scmprobe_config::ScmConfig;
use std::sync::Arc;
use tracing::debug;

/// Mercurial repository adapter.
#[derive(Debug)]
pub struct HgAdapter {
    /// Repository URL or local path.
    url: String,
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl HgAdapter {
    /// Adapter for the repository at `url`.
    #[must_use]
    pub fn new(url: impl Into<String>, runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_config(url, runner, &ScmConfig::default())
    }

    /// Adapter using the hg binary from `config`.
    #[must_use]
    pub fn with_config(
        url: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        config: &ScmConfig,
    ) -> Self {
        Self {
            url: url.into(),
            runner,
            program: config.tools.hg.clone(),
        }
    }

    /// Repository URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn command(&self) -> CommandLine {
        CommandLine::new(&self.program).arg("-R").arg(&self.url)
    }

    fn run(&self, command: &CommandLine) -> Result<String> {
        self.runner.run(command).map_err(|e| match e {
            VcsError::Command { message, .. } => Self::parse_hg_error(&message, &self.url),
            other => other,
        })
    }

    /// Contents of `path` as of `revision`.
    ///
    /// Returns `None` when the file does not exist in that revision.
    ///
    /// # Errors
    /// Returns error for any other hg failure.
    pub fn cat_file(&self, revision: &str, path: &str) -> Result<Option<String>> {
        debug!(url = %self.url, revision, path, "hg cat");
        let command = self
            .command()
            .args(["cat", "-r", revision, "--", path]);

        match self.run(&command) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.message().is_some_and(is_missing_file) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Contents of `path` in the first parent of `revision`.
    ///
    /// # Errors
    /// Returns error for any hg failure other than a missing file.
    pub fn cat_file_parent(&self, revision: &str, path: &str) -> Result<Option<String>> {
        self.cat_file(&format!("p1({revision})"), path)
    }

    /// Full node id of the repository tip.
    ///
    /// # Errors
    /// Returns error if hg fails or prints nothing.
    pub fn head_token(&self) -> Result<String> {
        let command = self
            .command()
            .args(["log", "-r", "tip", "--template", "{node}"]);
        let node = self.run(&command)?.trim().to_string();
        if node.is_empty() {
            return Err(VcsError::Mercurial {
                message: "hg log printed no node for tip".to_string(),
            });
        }
        Ok(node)
    }

    /// Parse Mercurial error output.
    fn parse_hg_error(stderr: &str, url: &str) -> VcsError {
        let stderr_lower = stderr.to_lowercase();

        if is_missing_file(&stderr_lower) {
            return VcsError::Mercurial {
                message: stderr.to_string(),
            };
        }

        if stderr_lower.contains("not found") || stderr_lower.contains("does not exist") {
            return VcsError::RepositoryNotFound {
                url: url.to_string(),
            };
        }

        if stderr_lower.contains("authorization")
            || stderr_lower.contains("authentication")
            || stderr_lower.contains("permission denied")
        {
            return VcsError::AuthenticationFailed {
                url: url.to_string(),
                reason: stderr.to_string(),
            };
        }

        VcsError::Mercurial {
            message: stderr.to_string(),
        }
    }
}

fn is_missing_file(message: &str) -> bool {
    message.contains("no such file in rev")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use parking_lot::Mutex;

    const HELLO: &str = "/* Hello, World! */\n#include <stdio.h>\nmain() {}\n";

    /// Answers `hg cat` by revision; records every command line.
    #[derive(Debug, Default)]
    struct Canned {
        seen: Mutex<Vec<CommandLine>>,
    }

    impl CommandRunner for Canned {
        fn run(&self, command: &CommandLine) -> Result<String> {
            self.seen.lock().push(command.clone());
            let fail = |message: &str| {
                Err(VcsError::Command {
                    command: command.label(),
                    message: message.to_string(),
                    exit_code: Some(1),
                })
            };
            if command.contains("tip") {
                return Ok("2a5dbc0e8e6d1f8b8d4b1b2c3d4e5f60718293a4\n".to_string());
            }
            if command.contains("75532c1e1f1d") && !command.contains("p1(") {
                return fail("helloworld.c: no such file in rev 75532c1e1f1d");
            }
            if command.contains("/srv/locked") {
                return fail("abort: authorization failed");
            }
            Ok(HELLO.to_string())
        }
    }

    fn adapter(url: &str) -> (HgAdapter, Arc<Canned>) {
        let runner = Arc::new(Canned::default());
        (HgAdapter::new(url, runner.clone()), runner)
    }

    #[test]
    fn deleted_file_exists_in_parent() {
        let (hg, _) = adapter("/srv/hg");
        assert_eq!(hg.cat_file("75532c1e1f1d", "helloworld.c").unwrap(), None);
        assert_eq!(
            hg.cat_file_parent("75532c1e1f1d", "helloworld.c").unwrap().as_deref(),
            Some(HELLO)
        );
        assert_eq!(
            hg.cat_file("468336c6671c", "helloworld.c").unwrap().as_deref(),
            Some(HELLO)
        );
    }

    #[test]
    fn odd_file_names_pass_verbatim() {
        let (hg, runner) = adapter("/srv/hg");
        let funny = "file_name (&'\")";
        hg.cat_file("tip", funny).unwrap();

        let seen = runner.seen.lock();
        assert_eq!(
            seen[0].args,
            vec!["-R", "/srv/hg", "cat", "-r", "tip", "--", funny]
        );
    }

    #[test]
    fn other_failures_propagate() {
        let (hg, _) = adapter("/srv/locked");
        let err = hg.cat_file("1", "a.txt").unwrap_err();
        assert!(err.is_auth_error());
    }

    #[test]
    fn head_token_is_tip_node() {
        let (hg, _) = adapter("/srv/hg");
        assert_eq!(
            hg.head_token().unwrap(),
            "2a5dbc0e8e6d1f8b8d4b1b2c3d4e5f60718293a4"
        );
    }

    #[test]
    fn parse_error_not_found() {
        let err = HgAdapter::parse_hg_error(
            "abort: repository https://example.com/repo not found",
            "https://example.com/repo",
        );
        assert!(matches!(err, VcsError::RepositoryNotFound { .. }));
    }
}
