//! Environment variable configuration support.

use crate::error::{ConfigError, Result};
use crate::types::ScmConfig;

/// Environment variables understood by scmprobe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScmEnvVar {
    /// `SCMPROBE_SVN` - svn client binary.
    Svn,
    /// `SCMPROBE_HG` - hg client binary.
    Hg,
    /// `SCMPROBE_CVS` - cvs client binary.
    Cvs,
    /// `SCMPROBE_PUBLIC_URLS_ONLY` - reject local-only URLs.
    PublicUrlsOnly,
    /// `SCMPROBE_MAX_TRUNK_DEPTH` - trunk search bound.
    MaxTrunkDepth,
}

impl ScmEnvVar {
    /// All variables, in the order they are applied.
    pub const ALL: [Self; 5] = [
        Self::Svn,
        Self::Hg,
        Self::Cvs,
        Self::PublicUrlsOnly,
        Self::MaxTrunkDepth,
    ];

    /// Get the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Svn => "SCMPROBE_SVN",
            Self::Hg => "SCMPROBE_HG",
            Self::Cvs => "SCMPROBE_CVS",
            Self::PublicUrlsOnly => "SCMPROBE_PUBLIC_URLS_ONLY",
            Self::MaxTrunkDepth => "SCMPROBE_MAX_TRUNK_DEPTH",
        }
    }
}

/// Parse a boolean flag (1/true/yes/on, 0/false/no/off).
fn parse_bool(var: ScmEnvVar, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::BadEnvVar {
            var: var.as_str(),
            expected: "1/true/yes/on or 0/false/no/off",
            found: value.to_string(),
        }),
    }
}

/// Values picked up from the environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// svn binary override.
    pub svn: Option<String>,
    /// hg binary override.
    pub hg: Option<String>,
    /// cvs binary override.
    pub cvs: Option<String>,
    /// Public URL policy override.
    pub public_urls_only: Option<bool>,
    /// Trunk search bound override.
    pub max_trunk_depth: Option<usize>,
}

impl EnvConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// # Errors
    /// Returns error if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |var: ScmEnvVar| lookup(var.as_str()).filter(|v| !v.trim().is_empty());

        let public_urls_only = get(ScmEnvVar::PublicUrlsOnly)
            .map(|v| parse_bool(ScmEnvVar::PublicUrlsOnly, &v))
            .transpose()?;

        let max_trunk_depth = get(ScmEnvVar::MaxTrunkDepth)
            .map(|v| {
                v.trim().parse::<usize>().map_err(|_| ConfigError::BadEnvVar {
                    var: ScmEnvVar::MaxTrunkDepth.as_str(),
                    expected: "a positive integer",
                    found: v.clone(),
                })
            })
            .transpose()?;

        Ok(Self {
            svn: get(ScmEnvVar::Svn),
            hg: get(ScmEnvVar::Hg),
            cvs: get(ScmEnvVar::Cvs),
            public_urls_only,
            max_trunk_depth,
        })
    }

    /// Whether no variable was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply environment overrides to a configuration.
    pub fn apply_to(&self, config: &mut ScmConfig) {
        if let Some(ref svn) = self.svn {
            config.tools.svn.clone_from(svn);
        }
        if let Some(ref hg) = self.hg {
            config.tools.hg.clone_from(hg);
        }
        if let Some(ref cvs) = self.cvs {
            config.tools.cvs.clone_from(cvs);
        }
        if let Some(public) = self.public_urls_only {
            config.public_urls_only = public;
        }
        if let Some(depth) = self.max_trunk_depth {
            config.max_trunk_depth = depth;
        }
    }
}
