//! Parsers for `info`-style and `ls`-style command output.

use crate::error::{Result, VcsError};
use crate::types::DirectoryEntry;

/// Directory name reserved by CVS; never reported by listings.
pub const CVSROOT_DIR: &str = "CVSROOT";

/// Key/value record from `svn info`.
///
/// Each line reads `Key: value`; lines without a separator are ignored.
/// Only the first record is kept when the output describes several targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoRecord {
    fields: Vec<(String, String)>,
}

impl InfoRecord {
    /// Field holding the repository root URL.
    pub const REPOSITORY_ROOT: &'static str = "Repository Root";
    /// Field holding the repository UUID.
    pub const REPOSITORY_UUID: &'static str = "Repository UUID";
    /// Field holding the node kind (`file` or `directory`).
    pub const NODE_KIND: &'static str = "Node Kind";
    /// Field holding the queried revision.
    pub const REVISION: &'static str = "Revision";
    /// Field holding the last changed revision.
    pub const LAST_CHANGED_REV: &'static str = "Last Changed Rev";
    /// Field holding the target URL.
    pub const URL: &'static str = "URL";

    /// Parse the output of `svn info`.
    #[must_use]
    pub fn parse(output: &str) -> Self {
        let mut fields = Vec::new();
        for line in output.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                if fields.is_empty() {
                    continue;
                }
                break;
            }
            if let Some((key, value)) = line.split_once(": ") {
                fields.push((key.trim().to_string(), value.trim().to_string()));
            }
        }
        Self { fields }
    }

    /// Value of `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of `key`, or a field-not-found error.
    ///
    /// # Errors
    /// Returns [`VcsError::FieldNotFound`] when the key is absent.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| VcsError::field_not_found(key, "svn info"))
    }

    /// Revision number of the queried target.
    ///
    /// # Errors
    /// Returns error when the field is absent or not a number.
    pub fn revision(&self) -> Result<u64> {
        let raw = self.require(Self::REVISION)?;
        raw.parse()
            .map_err(|_| VcsError::svn(format!("unexpected revision '{raw}' in svn info")))
    }

    /// Number of parsed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether nothing was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse `svn ls` output into sorted entries.
///
/// Blank lines and `CVSROOT/` are dropped. An empty result means the remote
/// directory exists but is empty.
#[must_use]
pub fn parse_listing(output: &str) -> Vec<DirectoryEntry> {
    let mut entries: Vec<DirectoryEntry> = output
        .lines()
        .filter_map(DirectoryEntry::from_listing_line)
        .filter(|e| !(e.is_directory && e.name == CVSROOT_DIR))
        .collect();
    entries.sort();
    entries
}
