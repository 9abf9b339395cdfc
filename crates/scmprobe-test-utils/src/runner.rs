//! Scripted command runner.
//!
//! Stands in for the svn, cvs and hg clients: every command is recorded and
//! answered from a list of canned responses. Commands nothing matches fail
//! the way an unreachable server does.

use parking_lot::Mutex;
use scmprobe_vcs::error::{Result, VcsError};
use scmprobe_vcs::{CommandLine, CommandRunner, uri_encode};
use std::fmt;

/// Message returned for commands without a scripted response.
pub const UNREACHABLE: &str = "svn: E170013: Unable to connect to a repository";

type Matcher = Box<dyn Fn(&CommandLine) -> bool + Send + Sync>;

struct Response {
    description: String,
    matches: Matcher,
    outcome: std::result::Result<String, String>,
}

/// Fake command runner with canned output.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: Vec<Response>,
    calls: Mutex<Vec<CommandLine>>,
}

impl fmt::Debug for ScriptedRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedRunner")
            .field(
                "responses",
                &self.responses.iter().map(|r| &r.description).collect::<Vec<_>>(),
            )
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

/// `svn SUB ... URL@REV` -> `(SUB, URL)`
fn svn_target(command: &CommandLine) -> Option<(&str, &str)> {
    let sub = command.args.first()?;
    let last = command.args.last()?;
    let target = last.rsplit_once('@').map_or(last.as_str(), |(url, _)| url);
    Some((sub.as_str(), target))
}

impl ScriptedRunner {
    /// Runner with no responses; every command fails as unreachable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands accepted by `matches` with `stdout`.
    #[must_use]
    pub fn respond(
        mut self,
        description: impl Into<String>,
        matches: impl Fn(&CommandLine) -> bool + Send + Sync + 'static,
        stdout: impl Into<String>,
    ) -> Self {
        self.responses.push(Response {
            description: description.into(),
            matches: Box::new(matches),
            outcome: Ok(stdout.into()),
        });
        self
    }

    /// Fail commands accepted by `matches` with `stderr`.
    #[must_use]
    pub fn fail(
        mut self,
        description: impl Into<String>,
        matches: impl Fn(&CommandLine) -> bool + Send + Sync + 'static,
        stderr: impl Into<String>,
    ) -> Self {
        self.responses.push(Response {
            description: description.into(),
            matches: Box::new(matches),
            outcome: Err(stderr.into()),
        });
        self
    }

    /// `svn SUB` against exactly `url`.
    fn svn_matcher(
        sub: &'static str,
        url: &str,
    ) -> impl Fn(&CommandLine) -> bool + Send + Sync + use<> {
        let encoded = uri_encode(url);
        move |command| svn_target(command) == Some((sub, encoded.as_str()))
    }

    /// Canned `svn ls` output for `url`.
    #[must_use]
    pub fn svn_ls(self, url: &str, listing: impl Into<String>) -> Self {
        self.respond(format!("svn ls {url}"), Self::svn_matcher("ls", url), listing)
    }

    /// Canned `svn info` output for `url`.
    #[must_use]
    pub fn svn_info(self, url: &str, info: impl Into<String>) -> Self {
        self.respond(format!("svn info {url}"), Self::svn_matcher("info", url), info)
    }

    /// `svn SUB` against `url` fails with `stderr`.
    #[must_use]
    pub fn svn_error(self, sub: &'static str, url: &str, stderr: impl Into<String>) -> Self {
        self.fail(format!("svn {sub} {url} fails"), Self::svn_matcher(sub, url), stderr)
    }

    /// Any command containing every needle answers with `stdout`.
    #[must_use]
    pub fn when_args(self, needles: &[&str], stdout: impl Into<String>) -> Self {
        let needles: Vec<String> = needles.iter().map(|n| (*n).to_string()).collect();
        let description = format!("args containing {needles:?}");
        self.respond(
            description,
            move |command| needles.iter().all(|n| command.contains(n)),
            stdout,
        )
    }

    /// Every command run so far.
    #[must_use]
    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().clone()
    }

    /// Number of commands run so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Commands whose first argument is `sub`.
    #[must_use]
    pub fn calls_to(&self, sub: &str) -> Vec<CommandLine> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.args.first().is_some_and(|a| a == sub))
            .cloned()
            .collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &CommandLine) -> Result<String> {
        self.calls.lock().push(command.clone());

        let response = self.responses.iter().find(|r| (r.matches)(command));
        match response.map(|r| &r.outcome) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(stderr)) => Err(VcsError::Command {
                command: command.label(),
                message: stderr.clone(),
                exit_code: Some(1),
            }),
            None => Err(VcsError::Command {
                command: command.label(),
                message: UNREACHABLE.to_string(),
                exit_code: Some(1),
            }),
        }
    }
}
