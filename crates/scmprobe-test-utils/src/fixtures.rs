//! Canned command output for common testing scenarios.
//!
//! The listings and rlog output are modeled on public forge repositories of
//! the kind the resolver is pointed at in practice.

/// Subversion output fixtures.
#[derive(Debug)]
pub struct SvnFixtures;

impl SvnFixtures {
    /// UUID used by [`SvnFixtures::info`].
    pub const UUID: &'static str = "6a9cefd4-a008-4d2a-a89b-d77e99cd6eb1";

    /// `svn info` output for `url` inside the repository at `root`.
    #[must_use]
    pub fn info(url: &str, root: &str, revision: u64, node_kind: &str) -> String {
        let relative = url.strip_prefix(root).unwrap_or_default();
        format!(
            "Path: {path}\n\
             URL: {url}\n\
             Relative URL: ^{relative}\n\
             Repository Root: {root}\n\
             Repository UUID: {uuid}\n\
             Revision: {revision}\n\
             Node Kind: {node_kind}\n\
             Last Changed Author: robin\n\
             Last Changed Rev: {revision}\n\
             Last Changed Date: 2009-02-05 12:00:00 +0000 (Thu, 05 Feb 2009)\n\n",
            path = url.rsplit('/').next().unwrap_or_default(),
            uuid = Self::UUID,
        )
    }

    /// `svn info` for a directory.
    #[must_use]
    pub fn directory_info(url: &str, root: &str, revision: u64) -> String {
        Self::info(url, root, revision, "directory")
    }

    /// Top level of a conventional repository.
    #[must_use]
    pub fn standard_layout() -> &'static str {
        "branches/\ntags/\ntrunk/\n"
    }

    /// Top level of a repository hosting several projects.
    #[must_use]
    pub fn multi_project_layout() -> &'static str {
        "CVSROOT/\ncore/\ndocs/\nplugins/\n"
    }

    /// A typical trunk: files and source directories.
    #[must_use]
    pub fn trunk_contents() -> &'static str {
        "COPYING\nMakefile\nREADME\ndoc/\nsrc/\n"
    }

    /// Error printed when a path is a file.
    #[must_use]
    pub fn not_a_directory(path: &str) -> String {
        format!("svn: E160016: '{path}' is not a directory in filesystem '{}'", Self::UUID)
    }

    /// Error printed for a missing path.
    #[must_use]
    pub fn non_existent(url: &str) -> String {
        format!("svn: E170000: URL '{url}' non-existent in revision 42")
    }

    /// Error printed when credentials are refused.
    #[must_use]
    pub fn authorization_failed() -> &'static str {
        "svn: E170001: Authorization failed"
    }
}

/// CVS output fixtures.
#[derive(Debug)]
pub struct CvsFixtures;

impl CvsFixtures {
    /// Anonymous pserver root of the moodle project.
    pub const MOODLE_ROOT: &'static str =
        ":pserver:anonymous:@moodle.cvs.sourceforge.net:/cvsroot/moodle";

    /// `cvs rlog -h` header block for one file.
    #[must_use]
    pub fn rlog_entry(rcs_file: &str) -> String {
        let working = rcs_file
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .trim_end_matches(",v");
        format!(
            "\nRCS file: {rcs_file}\n\
             head: 1.2\n\
             branch:\n\
             locks: strict\n\
             access list:\n\
             keyword substitution: kv\n\
             total revisions: 2\n\
             =============================================================================\n\
             Working file: {working}\n"
        )
    }

    /// `cvs rlog -h` output for the moodle `contrib` module.
    #[must_use]
    pub fn moodle_contrib_rlog() -> String {
        [
            "/cvsroot/moodle/contrib/README,v",
            "/cvsroot/moodle/contrib/foo/bar/baz.php,v",
            "/cvsroot/moodle/contrib/Attic/old.php,v",
            "/cvsroot/moodle/contrib/hello/world.php,v",
            "/cvsroot/moodle/contrib/hello/Attic/gone.php,v",
            "/cvsroot/moodle/contrib/foo/index.php,v",
        ]
        .iter()
        .map(|f| Self::rlog_entry(f))
        .collect()
    }
}
