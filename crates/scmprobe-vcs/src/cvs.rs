//! CVS adapter: root parsing and module directory discovery.

use crate::error::{Result, VcsError};
use crate::runner::{CommandLine, CommandRunner};
use ahash::AHashSet;
use scmprobe_config::ScmConfig;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Directory where CVS keeps the history of deleted files.
pub const ATTIC_DIR: &str = "Attic";

const RCS_FILE_PREFIX: &str = "RCS file:";

/// A parsed `CVSROOT` string.
///
/// Remote roots read `:method:user[:password]@host[:port]/path`; anything
/// starting with `/` (or using the `:local:` method) is a local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvsRoot {
    raw: String,
    /// Access method, e.g. `pserver` or `ext`.
    pub method: Option<String>,
    /// Login name.
    pub user: Option<String>,
    /// Password embedded in the root.
    pub password: Option<String>,
    /// Server host; `None` for local repositories.
    pub host: Option<String>,
    /// Server port.
    pub port: Option<u16>,
    /// Repository path on the server (or on disk).
    pub path: String,
}

impl CvsRoot {
    /// Parse a `CVSROOT` string.
    ///
    /// # Errors
    /// Returns [`VcsError::InvalidCvsRoot`] when the string fits neither form.
    pub fn parse(root: &str) -> Result<Self> {
        let invalid = |reason: &str| VcsError::InvalidCvsRoot {
            root: root.to_string(),
            reason: reason.to_string(),
        };

        let Some(rest) = root.strip_prefix(':') else {
            if !root.starts_with('/') {
                return Err(invalid("expected an absolute path or a :method: prefix"));
            }
            return Ok(Self::local(root, None, root));
        };

        let (method, rest) = rest
            .split_once(':')
            .ok_or_else(|| invalid("unterminated access method"))?;
        if method.is_empty() {
            return Err(invalid("empty access method"));
        }
        if method == "local" {
            if !rest.starts_with('/') {
                return Err(invalid("local root must be an absolute path"));
            }
            return Ok(Self::local(root, Some(method), rest));
        }

        let (userinfo, hostpart) = match rest.rsplit_once('@') {
            Some((userinfo, hostpart)) => (Some(userinfo), hostpart),
            None => (None, rest),
        };
        let (user, password) = match userinfo {
            Some(info) => match info.split_once(':') {
                Some((user, password)) => (Some(user), Some(password)),
                None => (Some(info), None),
            },
            None => (None, None),
        };

        let (host, port, path) = match hostpart.split_once(':') {
            Some((host, after)) => {
                let digits = after
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after.len());
                let port = if digits == 0 {
                    None
                } else {
                    Some(
                        after[..digits]
                            .parse::<u16>()
                            .map_err(|_| invalid("port out of range"))?,
                    )
                };
                (host, port, &after[digits..])
            }
            None => {
                let idx = hostpart
                    .find('/')
                    .ok_or_else(|| invalid("missing repository path"))?;
                (&hostpart[..idx], None, &hostpart[idx..])
            }
        };

        if host.is_empty() {
            return Err(invalid("missing host"));
        }
        if !path.starts_with('/') {
            return Err(invalid("repository path must be absolute"));
        }

        Ok(Self {
            raw: root.to_string(),
            method: Some(method.to_string()),
            user: user.map(str::to_string),
            password: password.map(str::to_string),
            host: Some(host.to_string()),
            port,
            path: path.to_string(),
        })
    }

    fn local(raw: &str, method: Option<&str>, path: &str) -> Self {
        Self {
            raw: raw.to_string(),
            method: method.map(str::to_string),
            user: None,
            password: None,
            host: None,
            port: None,
            path: path.to_string(),
        }
    }

    /// Whether the repository lives on a server.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.host.is_some()
    }

    /// The root exactly as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for CvsRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// CVS module adapter.
#[derive(Debug)]
pub struct CvsAdapter {
    root: CvsRoot,
    module_name: String,
    runner: Arc<dyn CommandRunner>,
    program: String,
}

impl CvsAdapter {
    /// Adapter for `module_name` inside the repository at `root`.
    ///
    /// # Errors
    /// Returns error if `root` cannot be parsed.
    pub fn new(
        root: &str,
        module_name: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self> {
        Self::with_config(root, module_name, runner, &ScmConfig::default())
    }

    /// Adapter using the cvs binary from `config`.
    ///
    /// # Errors
    /// Returns error if `root` cannot be parsed.
    pub fn with_config(
        root: &str,
        module_name: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        config: &ScmConfig,
    ) -> Result<Self> {
        Ok(Self {
            root: CvsRoot::parse(root)?,
            module_name: module_name.into(),
            runner,
            program: config.tools.cvs.clone(),
        })
    }

    /// Parsed root.
    #[must_use]
    pub const fn root(&self) -> &CvsRoot {
        &self.root
    }

    /// Module name.
    #[must_use]
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// `<root path>/<module>`
    fn module_path(&self) -> String {
        format!(
            "{}/{}",
            self.root.path.trim_end_matches('/'),
            self.module_name.trim_matches('/')
        )
    }

    /// Strip the server-side module prefix from `path`.
    ///
    /// Remote roots report absolute server paths, which are cut down to
    /// module-relative form (`""` for the module itself). Paths under a
    /// local root are returned unchanged.
    #[must_use]
    pub fn trim_directory<'a>(&self, path: &'a str) -> &'a str {
        if !self.root.is_remote() {
            return path;
        }
        relative_to(path, &self.module_path()).unwrap_or(path)
    }

    /// Module-relative form of a directory, regardless of root kind.
    ///
    /// `None` when `path` lies outside the module.
    fn relative_directory<'a>(&self, path: &'a str) -> Option<&'a str> {
        relative_to(path, &self.module_path())
    }

    /// Reduce raw directory paths to an ordered, module-relative list.
    ///
    /// Every ancestor of a listed directory is included, so parents always
    /// precede their children. Paths outside the module and `Attic`
    /// directories (with anything below them) are left out, duplicates
    /// collapse, and the result is ordered by depth with ties kept in
    /// discovery order.
    #[must_use]
    pub fn build_ordered_directory_list<I, S>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = AHashSet::new();
        let mut ordered = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let Some(relative) = self.relative_directory(path) else {
                debug!(path, module = %self.module_name, "skipping path outside module");
                continue;
            };
            for dir in with_ancestors(relative) {
                if in_attic(dir) || !seen.insert(dir.to_string()) {
                    continue;
                }
                ordered.push(dir.to_string());
            }
        }

        ordered.sort_by_key(|dir| depth(dir));
        ordered
    }

    /// All directories of the module that hold versioned files.
    ///
    /// # Errors
    /// Returns error if `cvs rlog` fails.
    pub fn directory_list(&self) -> Result<Vec<String>> {
        let command = CommandLine::new(&self.program)
            .arg("-d")
            .arg(self.root.as_str())
            .args(["-Q", "rlog", "-h"])
            .arg(&self.module_name);
        let output = self.runner.run(&command)?;

        let directories: Vec<&str> = output
            .lines()
            .filter_map(|line| line.strip_prefix(RCS_FILE_PREFIX))
            .map(str::trim)
            .filter_map(|file| file.rsplit_once('/').map(|(dir, _)| dir))
            .collect();
        debug!(module = %self.module_name, files = directories.len(), "cvs rlog parsed");

        Ok(self.build_ordered_directory_list(directories))
    }
}

/// `path` relative to `prefix`, if it lies below it.
fn relative_to<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    match path.strip_prefix(prefix)? {
        "" => Some(""),
        rest if rest.starts_with('/') => Some(rest.trim_matches('/')),
        _ => None,
    }
}

/// `"a/b/c"` -> `["", "a", "a/b", "a/b/c"]`; `""` -> `[""]`.
fn with_ancestors(relative: &str) -> impl Iterator<Item = &str> {
    let ends = relative
        .match_indices('/')
        .map(|(i, _)| i)
        .chain((!relative.is_empty()).then_some(relative.len()));
    std::iter::once("").chain(ends.map(move |end| &relative[..end]))
}

/// `Attic` itself, or anything below one.
fn in_attic(dir: &str) -> bool {
    dir.split('/').any(|segment| segment == ATTIC_DIR)
}

fn depth(dir: &str) -> usize {
    if dir.is_empty() {
        0
    } else {
        dir.matches('/').count() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct NoCommands;

    impl CommandRunner for NoCommands {
        fn run(&self, command: &CommandLine) -> Result<String> {
            Err(VcsError::ToolNotAvailable {
                tool: command.program.clone(),
            })
        }
    }

    const MOODLE: &str = ":pserver:anonymous:@moodle.cvs.sourceforge.net:/cvsroot/moodle";

    fn adapter(root: &str, module: &str) -> CvsAdapter {
        CvsAdapter::new(root, module, Arc::new(NoCommands)).unwrap()
    }

    #[test]
    fn parse_pserver_root() {
        let root =
            CvsRoot::parse(":pserver:anonymous:@moodle.cvs.sourceforge.net:/cvsroot/moodle")
                .unwrap();
        assert_eq!(root.method.as_deref(), Some("pserver"));
        assert_eq!(root.user.as_deref(), Some("anonymous"));
        assert_eq!(root.password.as_deref(), Some(""));
        assert_eq!(root.host.as_deref(), Some("moodle.cvs.sourceforge.net"));
        assert_eq!(root.port, None);
        assert_eq!(root.path, "/cvsroot/moodle");
        assert!(root.is_remote());
    }

    #[test]
    fn parse_root_with_port() {
        let root = CvsRoot::parse(":pserver:anoncvs:anoncvs@libvirt.org:2401/data/cvs").unwrap();
        assert_eq!(root.host.as_deref(), Some("libvirt.org"));
        assert_eq!(root.port, Some(2401));
        assert_eq!(root.path, "/data/cvs");
    }

    #[test]
    fn parse_local_roots() {
        let root = CvsRoot::parse("/Users/robin/cvs_repo/").unwrap();
        assert!(!root.is_remote());
        assert_eq!(root.path, "/Users/robin/cvs_repo/");

        let root = CvsRoot::parse(":local:/var/cvs").unwrap();
        assert!(!root.is_remote());
        assert_eq!(root.path, "/var/cvs");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "cvs.example.org:/cvs", ":pserver", ":pserver:@:/x", ":ext:user@host:relative"] {
            assert!(
                matches!(CvsRoot::parse(bad), Err(VcsError::InvalidCvsRoot { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn local_directory_trim() {
        let cvs = adapter("/Users/robin/cvs_repo/", "simple");
        assert_eq!(
            cvs.trim_directory("/Users/robin/cvs_repo/simple/foo.rb"),
            "/Users/robin/cvs_repo/simple/foo.rb"
        );
    }

    #[test]
    fn remote_directory_trim() {
        let cvs = adapter(MOODLE, "contrib");
        assert_eq!(cvs.trim_directory("/cvsroot/moodle/contrib/foo.rb"), "foo.rb");
        assert_eq!(cvs.trim_directory("/cvsroot/moodle/contrib"), "");
    }

    #[test]
    fn remote_directory_trim_with_port_number() {
        let cvs = adapter(":pserver:anoncvs:anoncvs@libvirt.org:2401/data/cvs", "libvirt");
        assert_eq!(cvs.trim_directory("/data/cvs/libvirt/docs/html/Attic"), "docs/html/Attic");
    }

    #[test]
    fn trim_does_not_match_sibling_modules() {
        let cvs = adapter(MOODLE, "contrib");
        assert_eq!(
            cvs.trim_directory("/cvsroot/moodle/contrib-old/foo.rb"),
            "/cvsroot/moodle/contrib-old/foo.rb"
        );
    }

    #[test]
    fn ordered_directory_list() {
        let cvs = adapter(MOODLE, "contrib");
        let list = cvs.build_ordered_directory_list([
            "/cvsroot/moodle/contrib/foo/bar",
            "/cvsroot/moodle/contrib",
            "/cvsroot/moodle/contrib/hello",
            "/cvsroot/moodle/contrib/hello",
        ]);
        assert_eq!(list, vec!["", "foo", "hello", "foo/bar"]);
    }

    #[test]
    fn ordered_directory_list_ignores_attic() {
        let cvs = adapter(MOODLE, "contrib");
        let list = cvs.build_ordered_directory_list([
            "/cvsroot/moodle/contrib/foo/bar",
            "/cvsroot/moodle/contrib/Attic",
            "/cvsroot/moodle/contrib/hello/Attic",
        ]);
        assert_eq!(list, vec!["", "foo", "hello", "foo/bar"]);
    }

    #[test]
    fn ordered_directory_list_skips_other_modules() {
        let cvs = adapter(MOODLE, "contrib");
        let list = cvs.build_ordered_directory_list([
            "/cvsroot/moodle/contrib/foo",
            "/cvsroot/moodle/other/x",
            "/cvsroot/moodle/contrib-old/y",
            "/elsewhere",
        ]);
        assert_eq!(list, vec!["", "foo"]);

        let local = adapter("/Users/robin/cvs_repo/", "simple");
        let list = local.build_ordered_directory_list([
            "/Users/robin/cvs_repo/simple/lib",
            "/Users/robin/cvs_repo/other/lib",
        ]);
        assert_eq!(list, vec!["", "lib"]);
    }

    #[test]
    fn ordered_directory_list_local_root() {
        let cvs = adapter("/Users/robin/cvs_repo/", "simple");
        let list = cvs.build_ordered_directory_list(["/Users/robin/cvs_repo/simple/lib/util"]);
        assert_eq!(list, vec!["", "lib", "lib/util"]);
    }

    #[test]
    fn empty_input() {
        let cvs = adapter("/var/cvs", "m");
        assert!(cvs.build_ordered_directory_list(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn ancestors() {
        assert_eq!(with_ancestors("").collect::<Vec<_>>(), vec![""]);
        assert_eq!(with_ancestors("a/b/c").collect::<Vec<_>>(), vec!["", "a", "a/b", "a/b/c"]);
        assert_eq!(depth(""), 0);
        assert_eq!(depth("a/b"), 2);
    }
}
