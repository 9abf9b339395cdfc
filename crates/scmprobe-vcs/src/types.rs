//! Core VCS types.

use crate::forge::Forge;
use crate::url::{UrlPolicy, UrlRejection, normalize_branch_name, normalize_url, validate_url};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported VCS types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsType {
    /// Subversion.
    Svn,
    /// CVS.
    Cvs,
    /// Mercurial.
    Hg,
}

impl VcsType {
    /// Get the default command name for this VCS.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        match self {
            Self::Svn => "svn",
            Self::Cvs => "cvs",
            Self::Hg => "hg",
        }
    }

    /// Guess the VCS from a repository address.
    ///
    /// CVS roots are colon-delimited (`:pserver:...`), Mercurial addresses
    /// usually carry an `hg` marker; everything else is treated as Subversion.
    #[must_use]
    pub fn detect(url: &str) -> Self {
        if url.starts_with(':') {
            Self::Cvs
        } else if url.starts_with("hg://")
            || url.starts_with("static-http://")
            || url.contains("/hg/")
            || url.ends_with("/hg")
        {
            Self::Hg
        } else {
            Self::Svn
        }
    }
}

impl fmt::Display for VcsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svn => write!(f, "svn"),
            Self::Cvs => write!(f, "cvs"),
            Self::Hg => write!(f, "hg"),
        }
    }
}

impl std::str::FromStr for VcsType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svn" | "subversion" => Ok(Self::Svn),
            "cvs" => Ok(Self::Cvs),
            "hg" | "mercurial" => Ok(Self::Hg),
            _ => Err(format!("unknown vcs type: {s}")),
        }
    }
}

/// One resolved or in-progress repository coordinate.
///
/// `url` and `branch_name` move together: every segment appended to one is
/// appended to the other.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RepositoryLocation {
    /// Best-known root or sub-path URL. Empty when no URL was supplied.
    pub url: String,
    /// Path below the repository root (`""` at the root, `/trunk` below it).
    pub branch_name: String,
    /// Reject URLs only reachable from this machine.
    public_urls_only: bool,
    /// Username passed out-of-band.
    username: Option<String>,
    /// Password passed out-of-band.
    #[serde(skip_serializing, default)]
    password: Option<String>,
}

impl fmt::Debug for RepositoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryLocation")
            .field("url", &self.url)
            .field("branch_name", &self.branch_name)
            .field("public_urls_only", &self.public_urls_only)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl RepositoryLocation {
    /// Location for a URL under the public policy.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            public_urls_only: true,
            ..Self::default()
        }
    }

    /// Location for a trusted caller, which may use `file://` URLs.
    #[must_use]
    pub fn internal(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            public_urls_only: false,
            ..Self::default()
        }
    }

    /// Set the starting branch path.
    #[must_use]
    pub fn with_branch_name(mut self, branch_name: impl Into<String>) -> Self {
        self.branch_name = branch_name.into();
        self
    }

    /// Attach credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the URL policy.
    #[must_use]
    pub const fn with_public_urls_only(mut self, public_urls_only: bool) -> Self {
        self.public_urls_only = public_urls_only;
        self
    }

    /// Whether only public URLs are acceptable.
    #[must_use]
    pub const fn public_urls_only(&self) -> bool {
        self.public_urls_only
    }

    /// Policy derived from the flag.
    #[must_use]
    pub const fn policy(&self) -> UrlPolicy {
        UrlPolicy::from_public_only(self.public_urls_only)
    }

    /// Username, if any.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Validate the URL under this location's policy.
    ///
    /// # Errors
    /// Returns the reason the URL is unacceptable.
    pub fn validate(&self) -> Result<(), UrlRejection> {
        validate_url(&self.url, self.policy())
    }

    /// Canonical form of this location. Idempotent.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        let url = normalize_url(&self.url).into_owned();
        self.url = url;
        let trimmed = normalize_branch_name(&self.branch_name).len();
        self.branch_name.truncate(trimmed);
        self
    }

    /// Forge hosting this location, if recognizable.
    #[must_use]
    pub fn guess_forge(&self) -> Option<Forge> {
        Forge::guess(&self.url)
    }
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Entry name without the trailing separator.
    pub name: String,
    /// Whether the listing marked the entry as a directory.
    pub is_directory: bool,
}

impl DirectoryEntry {
    /// Directory entry.
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }

    /// File entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }

    /// Parse one listing line; directories carry a trailing `/`.
    #[must_use]
    pub fn from_listing_line(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return None;
        }
        Some(match line.strip_suffix('/') {
            Some(name) => Self::directory(name),
            None => Self::file(line),
        })
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_directory {
            write!(f, "{}/", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}
