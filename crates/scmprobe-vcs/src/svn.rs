//! Subversion adapter over the `svn` command-line client.

use crate::auth::AuthOptions;
use crate::error::{Result, VcsError};
use crate::parse::{InfoRecord, parse_listing};
use crate::runner::{CommandLine, CommandRunner};
use crate::trunk::{RemoteLister, TrunkCursor, locate_trunk};
use crate::types::{DirectoryEntry, RepositoryLocation};
use crate::url::{join_path, normalize_branch_name, uri_encode};
use dashmap::DashMap;
use scmprobe_config::ScmConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Revision used when no upper bound was configured.
pub const HEAD: &str = "HEAD";

/// Subversion repository adapter.
///
/// Holds a [`RepositoryLocation`] and answers questions about it by running
/// `svn info` and `svn ls` against the server. `info` results are memoized
/// per target URL and revision.
#[derive(Debug)]
pub struct SvnAdapter {
    /// Location being inspected.
    location: RepositoryLocation,
    /// Command execution.
    runner: Arc<dyn CommandRunner>,
    /// svn binary.
    program: String,
    /// Upper revision bound for queries; `HEAD` when unset.
    final_token: Option<String>,
    /// Trunk search step limit.
    max_trunk_depth: usize,
    /// `(url, revision)` -> parsed `svn info`.
    info_cache: DashMap<(String, String), InfoRecord>,
}

impl SvnAdapter {
    /// Adapter with default settings.
    #[must_use]
    pub fn new(location: RepositoryLocation, runner: Arc<dyn CommandRunner>) -> Self {
        Self::with_config(location, runner, &ScmConfig::default())
    }

    /// Adapter using binary and search settings from `config`.
    #[must_use]
    pub fn with_config(
        location: RepositoryLocation,
        runner: Arc<dyn CommandRunner>,
        config: &ScmConfig,
    ) -> Self {
        Self {
            location,
            runner,
            program: config.tools.svn.clone(),
            final_token: None,
            max_trunk_depth: config.max_trunk_depth,
            info_cache: DashMap::new(),
        }
    }

    /// Bound every query to `token` instead of `HEAD`.
    #[must_use]
    pub fn with_final_token(mut self, token: impl Into<String>) -> Self {
        self.final_token = Some(token.into());
        self
    }

    /// Current location.
    #[must_use]
    pub const fn location(&self) -> &RepositoryLocation {
        &self.location
    }

    /// Give the location back.
    #[must_use]
    pub fn into_location(self) -> RepositoryLocation {
        self.location
    }

    /// Current URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.location.url
    }

    /// Current branch path.
    #[must_use]
    pub fn branch_name(&self) -> &str {
        &self.location.branch_name
    }

    fn revision<'a>(&'a self, revision: Option<&'a str>) -> &'a str {
        revision.or(self.final_token.as_deref()).unwrap_or(HEAD)
    }

    /// `svn SUB -r REV <auth> URL@REV`
    fn peg_command(&self, sub: &str, url: &str, revision: &str) -> CommandLine {
        CommandLine::new(&self.program)
            .arg(sub)
            .arg("-r")
            .arg(revision)
            .args(AuthOptions::from_location(&self.location).to_args())
            .arg(format!("{}@{revision}", uri_encode(url)))
    }

    fn run(&self, command: &CommandLine, url: &str) -> Result<String> {
        self.runner
            .run(command)
            .map_err(|e| classify_error(e, url))
    }

    /// URL for `path` below the root and branch.
    fn branch_url(&self, path: Option<&str>) -> Result<String> {
        let root = self.root()?;
        let base = join_path(&root, &self.location.branch_name);
        Ok(join_path(&base, path.unwrap_or_default()))
    }

    /// `svn info` for the location URL, or for `path` below the branch.
    ///
    /// # Errors
    /// Returns the classified command error, e.g. [`VcsError::RepositoryNotFound`].
    pub fn info(&self, path: Option<&str>, revision: Option<&str>) -> Result<InfoRecord> {
        let revision = self.revision(revision).to_string();
        let url = match path {
            Some(_) => self.branch_url(path)?,
            None => self.location.url.clone(),
        };

        let key = (url, revision);
        if let Some(cached) = self.info_cache.get(&key) {
            return Ok(cached.value().clone());
        }

        let command = self.peg_command("info", &key.0, &key.1);
        let record = InfoRecord::parse(&self.run(&command, &key.0)?);
        self.info_cache.insert(key, record.clone());
        Ok(record)
    }

    /// Repository root URL.
    ///
    /// # Errors
    /// Returns error if `svn info` fails or lacks the field.
    pub fn root(&self) -> Result<String> {
        Ok(self
            .info(None, None)?
            .require(InfoRecord::REPOSITORY_ROOT)?
            .to_string())
    }

    /// Repository UUID.
    ///
    /// # Errors
    /// Returns error if `svn info` fails or lacks the field.
    pub fn uuid(&self) -> Result<String> {
        Ok(self
            .info(None, None)?
            .require(InfoRecord::REPOSITORY_UUID)?
            .to_string())
    }

    /// Node kind (`file` or `directory`) of `path`.
    ///
    /// # Errors
    /// Returns error if `svn info` fails or lacks the field.
    pub fn node_kind(&self, path: Option<&str>, revision: Option<&str>) -> Result<String> {
        Ok(self
            .info(path, revision)?
            .require(InfoRecord::NODE_KIND)?
            .to_string())
    }

    /// Revision the location is at.
    ///
    /// # Errors
    /// Returns error if `svn info` fails or lacks the field.
    pub fn head_revision(&self) -> Result<u64> {
        self.info(None, None)?.revision()
    }

    /// Whether `path` is a directory.
    ///
    /// A path that svn reports as "not a directory in filesystem" is simply
    /// not a directory; any other failure is passed on.
    ///
    /// # Errors
    /// Returns the underlying command error.
    pub fn is_directory(&self, path: Option<&str>, revision: Option<&str>) -> Result<bool> {
        match self.node_kind(path, revision) {
            Ok(kind) => Ok(kind == "directory"),
            Err(e) if e.message().is_some_and(is_not_a_directory) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Whether the server answers for this location.
    #[must_use]
    pub fn exists(&self) -> bool {
        match self.head_revision() {
            Ok(_) => true,
            Err(e) => {
                debug!(url = %self.location.url, error = %e, "svn location does not exist");
                false
            }
        }
    }

    /// Check that the server can be reached and the location queried.
    ///
    /// # Errors
    /// Returns the failure seen while talking to the server.
    pub fn check_server_connection(&self) -> Result<()> {
        self.head_revision().map(|_| ())
    }

    /// Children of `path` below the branch, sorted, `CVSROOT/` excluded.
    ///
    /// `None` means the server could not be queried; an empty list means the
    /// directory exists and is empty.
    #[must_use]
    pub fn ls(&self, path: Option<&str>, revision: Option<&str>) -> Option<Vec<DirectoryEntry>> {
        let url = match self.branch_url(path) {
            Ok(url) => url,
            Err(e) => {
                debug!(error = %e, "cannot resolve listing url");
                return None;
            }
        };
        match self.list_at(&url, revision) {
            Ok(entries) => Some(entries),
            Err(e) => {
                debug!(url, error = %e, "svn ls failed");
                None
            }
        }
    }

    fn list_at(&self, url: &str, revision: Option<&str>) -> Result<Vec<DirectoryEntry>> {
        let command = self.peg_command("ls", url, self.revision(revision));
        Ok(parse_listing(&self.run(&command, url)?))
    }

    /// Recompute `branch_name` as the URL's path below the repository root.
    ///
    /// # Errors
    /// Returns error if the root cannot be determined or the URL is not
    /// inside it.
    pub fn recalc_branch_name(&mut self) -> Result<&str> {
        let root = self.root()?;
        let rest = self
            .location
            .url
            .strip_prefix(root.trim_end_matches('/'))
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .ok_or_else(|| {
                VcsError::svn(format!(
                    "url {} is not inside repository root {root}",
                    self.location.url
                ))
            })?;
        self.location.branch_name = normalize_branch_name(rest).to_string();
        Ok(&self.location.branch_name)
    }

    /// Narrow the location to the repository's trunk.
    ///
    /// The URL is left untouched when the server cannot be reached.
    pub fn restrict_url_to_trunk(&mut self) -> &str {
        let start = TrunkCursor::from_location(&self.location);
        let found = locate_trunk(&*self, start, self.max_trunk_depth);
        if found.url != self.location.url {
            info!(from = %self.location.url, to = %found.url, "restricted url to trunk");
        }
        found.apply_to(&mut self.location);
        &self.location.url
    }

    /// Check out the location at `revision` into `dest`.
    ///
    /// # Errors
    /// Returns error if svn fails.
    pub fn checkout(&self, revision: &str, dest: &Path) -> Result<()> {
        debug!(url = %self.location.url, revision, dest = ?dest, "svn checkout");
        ensure_parent(dest, "svn checkout")?;
        let command = CommandLine::new(&self.program)
            .arg("checkout")
            .arg("-r")
            .arg(revision)
            .arg(format!("{}@{revision}", uri_encode(&self.location.url)))
            .arg(dest.to_string_lossy())
            .arg("--ignore-externals")
            .args(AuthOptions::from_location(&self.location).to_args());
        self.run(&command, &self.location.url).map(|_| ())
    }

    /// Export the branch at `revision` (default: final token or `HEAD`) into `dest`.
    ///
    /// # Errors
    /// Returns error if the root cannot be resolved or svn fails.
    pub fn export(&self, dest: &Path, revision: Option<&str>) -> Result<()> {
        let url = self.branch_url(None)?;
        let revision = self.revision(revision);
        debug!(url, revision, dest = ?dest, "svn export");
        ensure_parent(dest, "svn export")?;
        let command = CommandLine::new(&self.program)
            .args(["export", "--ignore-externals", "--force", "-r", revision])
            .args(AuthOptions::from_location(&self.location).to_args())
            .arg(uri_encode(&url))
            .arg(dest.to_string_lossy());
        self.run(&command, &url).map(|_| ())
    }

    /// Every path in the branch at `revision`, directories with a trailing `/`.
    ///
    /// # Errors
    /// Returns error if the root cannot be resolved or svn fails.
    pub fn ls_tree(&self, revision: &str) -> Result<Vec<String>> {
        let url = self.branch_url(None)?;
        let command = CommandLine::new(&self.program)
            .args(["ls", "-R", "-r", revision])
            .args(AuthOptions::from_location(&self.location).to_args())
            .arg(format!("{}@{revision}", uri_encode(&url)));
        Ok(self
            .run(&command, &url)?
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Filesystem path for `file://` URLs, or the server path of `svn+ssh://` URLs.
    #[must_use]
    pub fn local_path(&self) -> Option<&str> {
        let url = self.location.url.as_str();
        if let Some(path) = url.strip_prefix("file://") {
            return Some(path);
        }
        ssh_parts(url).map(|(_, path)| path)
    }

    /// Host of an `svn+ssh://` URL.
    #[must_use]
    pub fn ssh_hostname(&self) -> Option<&str> {
        ssh_parts(&self.location.url).map(|(host, _)| host)
    }
}

impl RemoteLister for SvnAdapter {
    fn list(&self, url: &str) -> Result<Vec<DirectoryEntry>> {
        self.list_at(url, None)
    }
}

/// Create the parent directory of a checkout destination.
fn ensure_parent(dest: &Path, command: &str) -> Result<()> {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| VcsError::Io {
                command: command.to_string(),
                message: format!("{}: {e}", parent.display()),
            })
        }
        _ => Ok(()),
    }
}

/// Split `svn+ssh://host/path` into host and a non-trivial path.
fn ssh_parts(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("svn+ssh://")?;
    let idx = rest.find('/')?;
    let (host, path) = rest.split_at(idx);
    (!host.is_empty() && path.len() > 1).then_some((host, path))
}

fn is_not_a_directory(message: &str) -> bool {
    message.contains("is not a directory in filesystem")
}

/// Turn raw svn failures into "not found" or "auth" errors where recognizable.
fn classify_error(err: VcsError, url: &str) -> VcsError {
    let VcsError::Command { ref message, .. } = err else {
        return err;
    };
    let lower = message.to_lowercase();

    if lower.contains("authorization failed") || lower.contains("authentication failed") {
        return VcsError::AuthenticationFailed {
            url: url.to_string(),
            reason: message.clone(),
        };
    }

    if lower.contains("not found")
        || lower.contains("doesn't exist")
        || lower.contains("non-existent")
    {
        return VcsError::RepositoryNotFound {
            url: url.to_string(),
        };
    }

    err
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_error(message: &str) -> VcsError {
        VcsError::Command {
            command: "svn info".to_string(),
            message: message.to_string(),
            exit_code: Some(1),
        }
    }

    #[test]
    fn classify_not_found() {
        let err = classify_error(
            command_error("svn: E170000: URL 'https://example.com/repo' doesn't exist"),
            "https://example.com/repo",
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn classify_auth() {
        let err = classify_error(
            command_error("svn: E170001: Authorization failed"),
            "https://example.com/repo",
        );
        assert!(err.is_auth_error());
    }

    #[test]
    fn classify_keeps_other_errors() {
        let err = classify_error(
            command_error("svn: E160016: '/trunk/README' is not a directory in filesystem 'abc'"),
            "https://example.com/repo",
        );
        assert!(err.message().is_some_and(is_not_a_directory));
    }

    #[test]
    fn ssh_and_file_paths() {
        assert_eq!(
            ssh_parts("svn+ssh://svn.example.org/var/svn"),
            Some(("svn.example.org", "/var/svn"))
        );
        assert_eq!(ssh_parts("svn+ssh://svn.example.org/"), None);
        assert_eq!(ssh_parts("svn://svn.example.org/var"), None);
    }
}
