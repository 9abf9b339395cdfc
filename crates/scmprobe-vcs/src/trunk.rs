//! Server-side search for a repository's trunk.
//!
//! Processing every branch and tag of a Subversion repository is expensive,
//! so before importing we walk down from the URL the user gave us:
//!
//! 1. If the current directory contains a subdirectory named `trunk`, go there.
//! 2. If the current directory holds nothing but a single subdirectory, go there.
//!
//! The walk repeats until neither rule applies. A listing that fails (server
//! unreachable, path gone) ends the walk where it is; "could not narrow
//! further" is a normal outcome, not an error.

use crate::error::Result;
use crate::types::{DirectoryEntry, RepositoryLocation};
use crate::url::join_path;
use tracing::{debug, warn};

/// Name of the conventional development line directory.
pub const TRUNK: &str = "trunk";

/// Anything that can list the immediate children of a remote URL.
pub trait RemoteLister {
    /// List `url`. Directory entries carry `is_directory`; `CVSROOT` is
    /// already filtered out.
    ///
    /// # Errors
    /// Returns error if the listing could not be obtained.
    fn list(&self, url: &str) -> Result<Vec<DirectoryEntry>>;
}

/// Position of the walk: a URL and the branch path that leads to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrunkCursor {
    /// Current URL.
    pub url: String,
    /// Path below the root, extended in step with `url`.
    pub branch_name: String,
}

impl TrunkCursor {
    /// Cursor at the location's current position.
    #[must_use]
    pub fn from_location(location: &RepositoryLocation) -> Self {
        Self {
            url: location.url.clone(),
            branch_name: location.branch_name.clone(),
        }
    }

    /// Move one directory down.
    #[must_use]
    pub fn descend(self, name: &str) -> Self {
        Self {
            url: join_path(&self.url, name),
            branch_name: join_path(&self.branch_name, name),
        }
    }

    /// Write the position back into a location.
    pub fn apply_to(self, location: &mut RepositoryLocation) {
        location.url = self.url;
        location.branch_name = self.branch_name;
    }
}

/// Pick the directory to descend into, if any rule applies.
fn next_step(entries: &[DirectoryEntry]) -> Option<&str> {
    if entries.iter().any(|e| e.is_directory && e.name == TRUNK) {
        return Some(TRUNK);
    }
    match entries {
        [only] if only.is_directory => Some(&only.name),
        _ => None,
    }
}

/// Walk from `cursor` toward the trunk, taking at most `max_steps` steps.
///
/// Returns the final position. Listing failures stop the walk and leave the
/// cursor at the last position that could be listed.
pub fn locate_trunk<L>(lister: &L, mut cursor: TrunkCursor, max_steps: usize) -> TrunkCursor
where
    L: RemoteLister + ?Sized,
{
    for _ in 0..max_steps {
        let entries = match lister.list(&cursor.url) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(url = %cursor.url, error = %e, "listing failed, trunk search stops");
                return cursor;
            }
        };

        let Some(name) = next_step(&entries) else {
            debug!(url = %cursor.url, entries = entries.len(), "trunk search settled");
            return cursor;
        };

        debug!(url = %cursor.url, into = name, "descending");
        cursor = cursor.descend(name);
    }

    warn!(
        url = %cursor.url,
        max_steps,
        "trunk search hit its step limit"
    );
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VcsError;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    /// In-memory server: URL -> listing. Unknown URLs fail like an
    /// unreachable server.
    #[derive(Default)]
    struct FakeServer {
        tree: HashMap<String, Vec<DirectoryEntry>>,
    }

    impl FakeServer {
        fn dir(mut self, url: &str, listing: &str) -> Self {
            self.tree
                .insert(url.to_string(), crate::parse::parse_listing(listing));
            self
        }
    }

    impl RemoteLister for FakeServer {
        fn list(&self, url: &str) -> Result<Vec<DirectoryEntry>> {
            self.tree
                .get(url)
                .cloned()
                .ok_or_else(|| VcsError::RepositoryNotFound {
                    url: url.to_string(),
                })
        }
    }

    fn start(url: &str) -> TrunkCursor {
        TrunkCursor {
            url: url.to_string(),
            branch_name: String::new(),
        }
    }

    #[test]
    fn descends_into_trunk() {
        let server = FakeServer::default()
            .dir("svn://h/repo", "branches/\ntags/\ntrunk/\n")
            .dir("svn://h/repo/trunk", "README\nsrc/\n");

        let found = locate_trunk(&server, start("svn://h/repo"), 32);
        assert_eq!(found.url, "svn://h/repo/trunk");
        assert_eq!(found.branch_name, "/trunk");
    }

    #[test]
    fn descends_through_single_directories() {
        let server = FakeServer::default()
            .dir("svn://h/repo", "project/\n")
            .dir("svn://h/repo/project", "trunk/\ntags/\n")
            .dir("svn://h/repo/project/trunk", "lib/\n")
            .dir("svn://h/repo/project/trunk/lib", "a.c\nb.c\n");

        let found = locate_trunk(&server, start("svn://h/repo"), 32);
        assert_eq!(found.url, "svn://h/repo/project/trunk/lib");
        assert_eq!(found.branch_name, "/project/trunk/lib");
    }

    #[test]
    fn single_file_stops() {
        let server = FakeServer::default().dir("svn://h/repo", "README\n");
        let found = locate_trunk(&server, start("svn://h/repo"), 32);
        assert_eq!(found, start("svn://h/repo"));
    }

    #[test]
    fn empty_and_crowded_listings_stop() {
        let server = FakeServer::default()
            .dir("svn://h/empty", "")
            .dir("svn://h/crowded", "a/\nb/\n");
        assert_eq!(locate_trunk(&server, start("svn://h/empty"), 32).url, "svn://h/empty");
        assert_eq!(locate_trunk(&server, start("svn://h/crowded"), 32).url, "svn://h/crowded");
    }

    #[test]
    fn trunk_file_is_not_a_directory() {
        let server = FakeServer::default().dir("svn://h/repo", "trunk\ntags/\n");
        assert_eq!(locate_trunk(&server, start("svn://h/repo"), 32).url, "svn://h/repo");
    }

    #[test]
    fn unreachable_server_leaves_cursor() {
        let server = FakeServer::default();
        let cursor = start("svn://down.example.org/repo");
        assert_eq!(locate_trunk(&server, cursor.clone(), 32), cursor);
    }

    #[test]
    fn failure_midway_keeps_last_good_position() {
        // trunk is advertised but cannot be listed
        let server = FakeServer::default().dir("svn://h/repo", "trunk/\n");
        let found = locate_trunk(&server, start("svn://h/repo"), 32);
        assert_eq!(found.url, "svn://h/repo/trunk");
        assert_eq!(found.branch_name, "/trunk");
    }

    #[test]
    fn step_limit_bounds_the_walk() {
        struct Bottomless;
        impl RemoteLister for Bottomless {
            fn list(&self, _url: &str) -> Result<Vec<DirectoryEntry>> {
                Ok(vec![DirectoryEntry::directory("trunk")])
            }
        }

        let found = locate_trunk(&Bottomless, start("svn://h/r"), 3);
        assert_eq!(found.branch_name, "/trunk/trunk/trunk");
    }

    #[test]
    fn apply_to_location() {
        let mut location = RepositoryLocation::new("svn://h/repo");
        let cursor = TrunkCursor::from_location(&location).descend("trunk");
        cursor.apply_to(&mut location);
        assert_eq!(location.url, "svn://h/repo/trunk");
        assert_eq!(location.branch_name, "/trunk");
    }
}
