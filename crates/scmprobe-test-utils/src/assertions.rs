//! Custom assertion helpers for scmprobe testing.
//!
//! Helpers return `anyhow::Result` so they compose inside property tests and
//! report every violated expectation with context.

use anyhow::{Result, bail};
use scmprobe_vcs::RepositoryLocation;

/// Assert that a location sits at `url` with branch path `branch_name`.
pub fn assert_location(
    location: &RepositoryLocation,
    url: &str,
    branch_name: &str,
) -> Result<()> {
    if location.url != url {
        bail!("url mismatch: expected {url}, found {}", location.url);
    }
    if location.branch_name != branch_name {
        bail!(
            "branch mismatch: expected '{branch_name}', found '{}'",
            location.branch_name
        );
    }
    Ok(())
}

/// Assert that `url` and `branch_name` grew by the same segments.
///
/// The branch path must be a suffix of the URL, and the URL minus that
/// suffix must equal `start_url`.
pub fn assert_moved_together(location: &RepositoryLocation, start_url: &str) -> Result<()> {
    let Some(prefix) = location.url.strip_suffix(&location.branch_name) else {
        bail!(
            "branch '{}' is not a suffix of {}",
            location.branch_name,
            location.url
        );
    };
    if prefix.trim_end_matches('/') != start_url.trim_end_matches('/') {
        bail!("walk started at {start_url} but location is {}", location.url);
    }
    Ok(())
}

/// Assert that a reduced directory list is well-formed.
///
/// Checks:
/// - No duplicates
/// - No `Attic` entries
/// - Every parent appears before its children
/// - Depth never decreases
pub fn assert_parents_first(directories: &[String]) -> Result<()> {
    let mut last_depth = 0;
    for (i, dir) in directories.iter().enumerate() {
        if directories[..i].contains(dir) {
            bail!("duplicate directory '{dir}'");
        }
        if dir.rsplit('/').next() == Some("Attic") {
            bail!("Attic directory '{dir}' in list");
        }

        let depth = if dir.is_empty() {
            0
        } else {
            dir.matches('/').count() + 1
        };
        if depth < last_depth {
            bail!("'{dir}' at depth {depth} follows depth {last_depth}");
        }
        last_depth = depth;

        if !dir.is_empty() {
            let parent = dir.rsplit_once('/').map_or("", |(parent, _)| parent);
            if !directories[..i].iter().any(|d| d == parent) {
                bail!("'{dir}' appears before its parent '{parent}'");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| (*d).to_string()).collect()
    }

    #[test]
    fn parents_first_accepts_ordered_list() {
        assert!(assert_parents_first(&dirs(&["", "foo", "hello", "foo/bar"])).is_ok());
    }

    #[test]
    fn parents_first_rejects_orphans_and_attic() {
        assert!(assert_parents_first(&dirs(&["", "foo/bar"])).is_err());
        assert!(assert_parents_first(&dirs(&["", "Attic"])).is_err());
        assert!(assert_parents_first(&dirs(&["", "a", "a"])).is_err());
    }

    #[test]
    fn moved_together() {
        let location = RepositoryLocation::new("svn://h/repo/trunk").with_branch_name("/trunk");
        assert!(assert_moved_together(&location, "svn://h/repo").is_ok());
        assert!(assert_moved_together(&location, "svn://h/other").is_err());
        assert!(assert_location(&location, "svn://h/repo/trunk", "/trunk").is_ok());
    }
}
