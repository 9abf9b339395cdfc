//! Subversion URL validation and normalization.
//!
//! The accepted grammar is deliberately narrow: `http`, `https` or `svn`, a
//! host, an optional numeric port and a path made of a small character set.
//! Anything else is rejected with a [`UrlRejection`] whose `Display` output
//! is meant to be shown to the person who typed the URL.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use thiserror::Error;

/// Schemes accepted under every policy.
const PUBLIC_SCHEMES: [&str; 3] = ["http", "https", "svn"];

/// Schemes belonging to other version control systems.
const FOREIGN_VCS_SCHEMES: [&str; 9] = [
    "git", "git+ssh", "ssh+git", "hg", "bzr", "bzr+ssh", "darcs", "cvs", "fossil",
];

/// Host part: letters, digits, `.`, `-`, `_`.
static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-.]+$").expect("valid host regex"));

/// Path part, always starting with a separator.
static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/[A-Za-z0-9_\-./+^~]*$").expect("valid path regex"));

/// `*.svn.sourceforge.net` reached over plain http.
static SOURCEFORGE_HTTP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^http://[A-Za-z0-9_\-.]+\.svn\.sourceforge\.net(?::\d+)?(?:/|$)")
        .expect("valid sourceforge regex")
});

/// Which URLs a caller is allowed to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UrlPolicy {
    /// Only URLs reachable by anyone on the network.
    #[default]
    PublicOnly,
    /// Trusted callers; `file://` repositories are allowed.
    Internal,
}

impl UrlPolicy {
    /// Map the `public_urls_only` flag to a policy.
    #[must_use]
    pub const fn from_public_only(public_urls_only: bool) -> Self {
        if public_urls_only {
            Self::PublicOnly
        } else {
            Self::Internal
        }
    }

    /// Whether `file://` URLs are acceptable.
    #[must_use]
    pub const fn allows_local(self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Why a URL failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlRejection {
    /// Nothing was supplied.
    #[error("The URL can't be left blank.")]
    Empty,

    /// Spaces, tabs or newlines somewhere in the URL.
    #[error("The URL must not contain spaces.")]
    ContainsWhitespace,

    /// A CVS connection string such as `:pserver:user@host:/root`.
    #[error("This looks like a CVS connection string. Please enter a Subversion URL.")]
    CvsConnectionString,

    /// No `scheme:` prefix.
    #[error("The URL must start with a protocol such as http://, https:// or svn://.")]
    MissingProtocol,

    /// A scheme without `//`, or `//` with nothing behind it.
    #[error("The protocol part of the URL is malformed.")]
    MalformedProtocol,

    /// Protocol of another version control system.
    #[error("The {scheme}:// protocol belongs to another version control system.")]
    ForeignProtocol {
        /// Scheme as typed.
        scheme: String,
    },

    /// A scheme outside the accepted set.
    #[error("The {scheme}:// protocol is not supported. Use http://, https:// or svn://.")]
    UnsupportedProtocol {
        /// Scheme as typed.
        scheme: String,
    },

    /// `file://` under the public policy.
    #[error("Local file:// repositories are not reachable by the public.")]
    LocalPathNotAllowed,

    /// `user@host` syntax.
    #[error("The URL must not contain a username. Supply credentials separately.")]
    EmbeddedUsername,

    /// Port that is empty or not numeric.
    #[error("The port number in the URL is invalid.")]
    MalformedPort,

    /// Host part with characters outside the allowed set.
    #[error("The server name in the URL is invalid.")]
    InvalidHost,

    /// Path with characters outside the allowed set.
    #[error("The URL path contains characters that are not allowed.")]
    InvalidPath,
}

/// Validate a candidate Subversion URL.
///
/// # Errors
/// Returns the first rule the URL breaks.
pub fn validate_url(url: &str, policy: UrlPolicy) -> Result<(), UrlRejection> {
    if url.is_empty() {
        return Err(UrlRejection::Empty);
    }
    if url.chars().any(char::is_whitespace) {
        return Err(UrlRejection::ContainsWhitespace);
    }
    if url.starts_with(':') || url.contains(":pserver:") || url.contains(":ext:") {
        return Err(UrlRejection::CvsConnectionString);
    }

    let (scheme, rest) = split_scheme(url).ok_or(UrlRejection::MissingProtocol)?;
    let rest = rest
        .strip_prefix("//")
        .filter(|r| !r.is_empty())
        .ok_or(UrlRejection::MalformedProtocol)?;

    let scheme_lower = scheme.to_ascii_lowercase();
    if FOREIGN_VCS_SCHEMES.contains(&scheme_lower.as_str()) {
        return Err(UrlRejection::ForeignProtocol {
            scheme: scheme.to_string(),
        });
    }

    if scheme_lower == "file" {
        if !policy.allows_local() {
            return Err(UrlRejection::LocalPathNotAllowed);
        }
        // file:///path or file://localhost/path
        let path = rest.strip_prefix("localhost").unwrap_or(rest);
        return if PATH_RE.is_match(path) {
            Ok(())
        } else {
            Err(UrlRejection::InvalidPath)
        };
    }

    if !PUBLIC_SCHEMES.contains(&scheme_lower.as_str()) {
        return Err(UrlRejection::UnsupportedProtocol {
            scheme: scheme.to_string(),
        });
    }

    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    if authority.contains('@') {
        return Err(UrlRejection::EmbeddedUsername);
    }

    let host = match authority.split_once(':') {
        Some((host, port)) => {
            if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
                return Err(UrlRejection::MalformedPort);
            }
            host
        }
        None => authority,
    };

    if !HOST_RE.is_match(host) {
        return Err(UrlRejection::InvalidHost);
    }
    if !path.is_empty() && !PATH_RE.is_match(path) {
        return Err(UrlRejection::InvalidPath);
    }

    Ok(())
}

/// Split `scheme:rest`, where the scheme follows RFC 3986 syntax.
fn split_scheme(url: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = url.split_once(':')?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic()
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return None;
    }
    Some((scheme, rest))
}

/// Rewrite per-project SourceForge hosts to https.
///
/// `*.svn.sourceforge.net` only serves Subversion over https; every other
/// host keeps the scheme the user supplied.
#[must_use]
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    if SOURCEFORGE_HTTP_RE.is_match(url) {
        Cow::Owned(format!("https{}", &url[4..]))
    } else {
        Cow::Borrowed(url)
    }
}

/// Strip trailing separators from a branch path; the root becomes `""`.
#[must_use]
pub fn normalize_branch_name(branch_name: &str) -> &str {
    branch_name.trim_end_matches('/')
}

/// Join path segments onto a URL or branch path with single separators.
///
/// Empty segments are skipped. An empty base joined with `trunk` yields
/// `/trunk`, matching how branch paths are written.
#[must_use]
pub fn join_path(base: &str, segment: &str) -> String {
    let segment = segment.trim_matches('/');
    if segment.is_empty() {
        return base.to_string();
    }
    format!("{}/{segment}", base.trim_end_matches('/'))
}

/// Percent-encode a URL for the svn client.
///
/// Leaves the URI reserved set alone except for `[ ] ' ; ?`, which svn
/// would otherwise interpret, and encodes everything else outside the
/// unreserved set, spaces included.
#[must_use]
pub fn uri_encode(url: &str) -> String {
    const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

    let mut result = String::with_capacity(url.len());
    for byte in url.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'('
            | b')'
            | b'/'
            | b':'
            | b'@'
            | b'&'
            | b'='
            | b'+'
            | b'$'
            | b',' => result.push(byte as char),
            _ => {
                result.push('%');
                result.push(HEX_DIGITS[(byte >> 4) as usize] as char);
                result.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
            }
        }
    }
    result
}
