//! Configuration types.

use serde::{Deserialize, Serialize};

/// Default bound on how many levels the trunk search may descend.
pub const DEFAULT_MAX_TRUNK_DEPTH: usize = 32;

/// Names or paths of the command-line clients that get invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Subversion client.
    pub svn: String,
    /// Mercurial client.
    pub hg: String,
    /// CVS client.
    pub cvs: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            svn: "svn".to_string(),
            hg: "hg".to_string(),
            cvs: "cvs".to_string(),
        }
    }
}

/// Resolved scmprobe configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScmConfig {
    /// Client binaries.
    pub tools: ToolPaths,
    /// Reject URLs that are only reachable from the local machine.
    pub public_urls_only: bool,
    /// Upper bound on trunk search steps.
    pub max_trunk_depth: usize,
}

impl Default for ScmConfig {
    fn default() -> Self {
        Self {
            tools: ToolPaths::default(),
            public_urls_only: true,
            max_trunk_depth: DEFAULT_MAX_TRUNK_DEPTH,
        }
    }
}

impl ScmConfig {
    /// Configuration for trusted, internal callers that may use `file://` URLs.
    #[must_use]
    pub fn internal() -> Self {
        Self {
            public_urls_only: false,
            ..Self::default()
        }
    }

    /// Override the svn binary.
    #[must_use]
    pub fn with_svn(mut self, svn: impl Into<String>) -> Self {
        self.tools.svn = svn.into();
        self
    }

    /// Override the trunk search bound.
    #[must_use]
    pub const fn with_max_trunk_depth(mut self, depth: usize) -> Self {
        self.max_trunk_depth = depth;
        self
    }
}
