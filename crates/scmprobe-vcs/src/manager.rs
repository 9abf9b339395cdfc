//! VCS manager tying configuration, command execution and adapters together.
//!
//! The `VcsManager` provides a single entry point for:
//! - Resolving a user-supplied Subversion URL to its trunk
//! - Handing out adapters that share one command runner

use crate::cvs::CvsAdapter;
use crate::error::{Result, VcsError};
use crate::forge::Forge;
use crate::hg::HgAdapter;
use crate::runner::{CommandRunner, ProcessRunner};
use crate::svn::SvnAdapter;
use crate::types::{RepositoryLocation, VcsType};
use scmprobe_config::ScmConfig;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of resolving a user-supplied URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocation {
    /// Validated, normalized location, narrowed to trunk where possible.
    pub location: RepositoryLocation,
    /// Hosting forge, if recognizable.
    pub forge: Option<Forge>,
}

/// VCS manager.
#[derive(Debug, Clone)]
pub struct VcsManager {
    /// Command execution shared by every adapter.
    runner: Arc<dyn CommandRunner>,
    /// Binaries and resolution settings.
    config: ScmConfig,
}

impl Default for VcsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsManager {
    /// Manager running real VCS clients with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runner: Arc::new(ProcessRunner::new()),
            config: ScmConfig::default(),
        }
    }

    /// Use a different command runner.
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Use a different configuration.
    #[must_use]
    pub fn with_config(mut self, config: ScmConfig) -> Self {
        self.config = config;
        self
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ScmConfig {
        &self.config
    }

    /// Guess which VCS a URL belongs to.
    #[must_use]
    pub fn detect(&self, url: &str) -> VcsType {
        VcsType::detect(url)
    }

    /// Resolve a Subversion URL.
    ///
    /// The URL is validated under the configured policy, normalized, tagged
    /// with its forge and finally narrowed to the repository's trunk.
    ///
    /// # Errors
    /// Returns [`VcsError::InvalidUrl`] if the URL is rejected. Server
    /// failures during the trunk search are not errors; the location is then
    /// returned as given.
    pub fn resolve_svn(
        &self,
        url: &str,
        credentials: Option<(&str, &str)>,
    ) -> Result<ResolvedLocation> {
        let mut location = RepositoryLocation::new(url)
            .with_public_urls_only(self.config.public_urls_only);
        if let Some((username, password)) = credentials {
            location = location.with_credentials(username, password);
        }

        location
            .validate()
            .map_err(|reason| VcsError::invalid_url(url, reason))?;

        let location = location.normalize();
        let forge = location.guess_forge();
        debug!(url = %location.url, forge = ?forge, "svn url accepted");

        let mut adapter = self.svn(location);
        adapter.restrict_url_to_trunk();
        let location = adapter.into_location();

        info!(
            url = %location.url,
            branch = %location.branch_name,
            forge = forge.map(Forge::domain),
            "resolved svn location"
        );
        Ok(ResolvedLocation { location, forge })
    }

    /// Subversion adapter for `location`.
    #[must_use]
    pub fn svn(&self, location: RepositoryLocation) -> SvnAdapter {
        SvnAdapter::with_config(location, Arc::clone(&self.runner), &self.config)
    }

    /// CVS adapter for `module` in the repository at `root`.
    ///
    /// # Errors
    /// Returns error if `root` is not a valid CVSROOT.
    pub fn cvs(&self, root: &str, module: &str) -> Result<CvsAdapter> {
        CvsAdapter::with_config(root, module, Arc::clone(&self.runner), &self.config)
    }

    /// Mercurial adapter for the repository at `url`.
    #[must_use]
    pub fn hg(&self, url: &str) -> HgAdapter {
        HgAdapter::with_config(url, Arc::clone(&self.runner), &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandLine;
    use crate::url::UrlRejection;
    use assert_matches::assert_matches;

    #[derive(Debug)]
    struct Offline;

    impl CommandRunner for Offline {
        fn run(&self, command: &CommandLine) -> Result<String> {
            Err(VcsError::Command {
                command: command.label(),
                message: "svn: E170013: Unable to connect to a repository".to_string(),
                exit_code: Some(1),
            })
        }
    }

    fn manager() -> VcsManager {
        VcsManager::new().with_runner(Arc::new(Offline))
    }

    #[test]
    fn rejects_invalid_url() {
        let err = manager()
            .resolve_svn("svn://robin@svn.example.org/repo", None)
            .unwrap_err();
        assert_matches!(
            err,
            VcsError::InvalidUrl {
                reason: UrlRejection::EmbeddedUsername,
                ..
            }
        );
    }

    #[test]
    fn local_urls_follow_config() {
        let public = manager();
        assert!(public.resolve_svn("file:///var/svn/repo", None).is_err());

        let internal = manager().with_config(ScmConfig::internal());
        let resolved = internal.resolve_svn("file:///var/svn/repo", None).unwrap();
        assert_eq!(resolved.location.url, "file:///var/svn/repo");
    }

    #[test]
    fn unreachable_server_keeps_normalized_url() {
        let resolved = manager()
            .resolve_svn("http://moodle.svn.sourceforge.net/svnroot/moodle/", None)
            .unwrap();
        assert_eq!(
            resolved.location.url,
            "https://moodle.svn.sourceforge.net/svnroot/moodle/"
        );
        assert_eq!(resolved.location.branch_name, "");
        assert_eq!(resolved.forge, Some(Forge::SourceForge));
    }

    #[test]
    fn detect_by_url_shape() {
        assert_eq!(manager().detect(":pserver:anonymous@cvs.example.org:/cvs"), VcsType::Cvs);
        assert_eq!(manager().detect("svn://svn.example.org/repo"), VcsType::Svn);
    }
}
