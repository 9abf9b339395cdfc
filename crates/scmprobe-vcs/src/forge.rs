//! Hosting forge inference from repository URLs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Known source hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Forge {
    /// RubyForge.
    #[serde(rename = "rubyforge.org")]
    RubyForge,
    /// SourceForge, including per-project `*.svn.sourceforge.net` hosts.
    #[serde(rename = "sourceforge.net")]
    SourceForge,
    /// java.net, including `*.dev.java.net` project hosts.
    #[serde(rename = "java.net")]
    JavaNet,
    /// Google Code.
    #[serde(rename = "googlecode.com")]
    GoogleCode,
}

impl Forge {
    /// Rules in priority order.
    const RULES: [(Self, &'static str); 4] = [
        (Self::RubyForge, "rubyforge.org"),
        (Self::SourceForge, "sourceforge.net"),
        (Self::JavaNet, "java.net"),
        (Self::GoogleCode, "googlecode.com"),
    ];

    /// The forge's domain, used as its display name.
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::RubyForge => "rubyforge.org",
            Self::SourceForge => "sourceforge.net",
            Self::JavaNet => "java.net",
            Self::GoogleCode => "googlecode.com",
        }
    }

    /// Guess the forge hosting `url`.
    ///
    /// Returns `None` for empty or unparseable URLs and for hosts that match no
    /// known forge.
    #[must_use]
    pub fn guess(url: &str) -> Option<Self> {
        let parsed = ::url::Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        Self::from_hostname(&host)
    }

    /// Classify a bare hostname.
    #[must_use]
    pub fn from_hostname(host: &str) -> Option<Self> {
        Self::RULES
            .iter()
            .find(|(_, domain)| host_in_domain(host, domain))
            .map(|(forge, _)| *forge)
    }
}

/// `host` equals `domain` or is one of its subdomains.
fn host_in_domain(host: &str, domain: &str) -> bool {
    host.strip_suffix(domain)
        .is_some_and(|prefix| prefix.is_empty() || prefix.ends_with('.'))
}

impl fmt::Display for Forge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.domain())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("svn://rubyforge.org//var/svn/rubyomf2097", Some(Forge::RubyForge) ; "rubyforge")]
    #[test_case("svn://rubyforge.org:3960//var/svn/rubyomf2097", Some(Forge::RubyForge) ; "rubyforge with port")]
    #[test_case("https://svn.sourceforge.net/svnroot/typo3/CoreDocs/trunk", Some(Forge::SourceForge) ; "sourceforge")]
    #[test_case("https://svn.sourceforge.net:80/svnroot/typo3/CoreDocs/trunk", Some(Forge::SourceForge) ; "sourceforge with port")]
    #[test_case("https://vegastrike.svn.sourceforge.net/svnroot/vegastrike/trunk", Some(Forge::SourceForge) ; "sourceforge project host")]
    #[test_case("https://appfuse.dev.java.net/svn/appfuse/trunk", Some(Forge::JavaNet) ; "java.net")]
    #[test_case("http://moulinette.googlecode.com/svn/trunk", Some(Forge::GoogleCode) ; "googlecode")]
    #[test_case("http://svn.gnome.org/svn/gtk+/trunk", None ; "unknown host")]
    #[test_case("http://notsourceforge.net/svn", None ; "suffix without dot")]
    #[test_case("garbage_in_garbage_out", None ; "garbage")]
    #[test_case("", None ; "absent")]
    fn guess(url: &str, expected: Option<Forge>) {
        assert_eq!(Forge::guess(url), expected);
    }

    #[test]
    fn display_is_domain() {
        assert_eq!(Forge::SourceForge.to_string(), "sourceforge.net");
        assert_eq!(Forge::guess("svn://rubyforge.org//var/svn/x").unwrap().to_string(), "rubyforge.org");
    }
}
