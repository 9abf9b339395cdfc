//! Repository location resolution for Subversion, CVS and Mercurial servers.
//!
//! This crate turns a user-supplied repository address into coordinates an
//! importer can work with:
//!
//! - **URL validation**: staged checks with a human-readable rejection reason
//! - **Normalization**: idempotent canonical form of URLs and branch paths
//! - **Forge inference**: which hosting provider serves a URL
//! - **Trunk location**: server-side search for the main development line
//! - **CVS directory ordering**: module directories with parents first
//!
//! # Quick Start
//!
//! ```no_run
//! use scmprobe_vcs::VcsManager;
//!
//! # fn main() -> scmprobe_vcs::error::Result<()> {
//! let manager = VcsManager::new();
//!
//! let resolved = manager.resolve_svn("https://svn.example.org/repos/project", None)?;
//! println!(
//!     "{} (branch '{}', forge {:?})",
//!     resolved.location.url, resolved.location.branch_name, resolved.forge
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Pure functions
//!
//! ```
//! use scmprobe_vcs::{Forge, UrlPolicy, normalize_url, validate_url};
//!
//! assert!(validate_url("svn://svn.example.org/repo", UrlPolicy::PublicOnly).is_ok());
//! assert!(validate_url("file:///var/svn", UrlPolicy::PublicOnly).is_err());
//! assert_eq!(
//!     normalize_url("http://foo.svn.sourceforge.net/svnroot/foo"),
//!     "https://foo.svn.sourceforge.net/svnroot/foo"
//! );
//! assert_eq!(Forge::guess("svn://rubyforge.org//var/svn/x"), Some(Forge::RubyForge));
//! ```
//!
//! # Module Structure
//!
//! - [`error`]: Error types for VCS operations
//! - [`types`]: Core types (`VcsType`, `RepositoryLocation`, `DirectoryEntry`)
//! - [`url`]: URL validation and normalization
//! - [`forge`]: Forge inference
//! - [`runner`]: Command execution seam
//! - [`auth`]: svn credential flags
//! - [`parse`]: svn output parsers
//! - [`trunk`]: Trunk locator
//! - [`svn`]: Subversion adapter
//! - [`cvs`]: CVS adapter and directory reducer
//! - [`hg`]: Mercurial adapter
//! - [`manager`]: Unified VCS manager

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod cvs;
pub mod error;
pub mod forge;
pub mod hg;
pub mod manager;
pub mod parse;
pub mod runner;
pub mod svn;
pub mod trunk;
pub mod types;
pub mod url;

// Re-export main types at crate root
pub use auth::AuthOptions;
pub use error::{Result, VcsError};
pub use forge::Forge;
pub use manager::{ResolvedLocation, VcsManager};
pub use parse::{InfoRecord, parse_listing};
pub use runner::{CommandLine, CommandRunner, ProcessRunner};
pub use trunk::{RemoteLister, TrunkCursor, locate_trunk};
pub use types::{DirectoryEntry, RepositoryLocation, VcsType};
pub use url::{
    UrlPolicy, UrlRejection, normalize_branch_name, normalize_url, uri_encode, validate_url,
};

// Re-export adapters
pub use cvs::{CvsAdapter, CvsRoot};
pub use hg::HgAdapter;
pub use svn::SvnAdapter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_exports() {
        // Ensure main types are accessible
        let _: VcsType = VcsType::Svn;
        let _ = RepositoryLocation::new("svn://svn.example.org/repo");
        let _ = VcsManager::new();
        let _ = UrlPolicy::default();
    }

    #[test]
    fn vcs_type_detect() {
        assert_eq!(VcsType::detect(":pserver:anonymous@cvs.example.org:/cvs"), VcsType::Cvs);
        assert_eq!(VcsType::detect("https://svn.example.org/repo"), VcsType::Svn);
    }

    #[test]
    fn location_round_trip() {
        let location = RepositoryLocation::new("http://foo.svn.sourceforge.net/svnroot/foo")
            .with_branch_name("/trunk/")
            .normalize();
        assert!(location.validate().is_ok());
        assert_eq!(location.url, "https://foo.svn.sourceforge.net/svnroot/foo");
        assert_eq!(location.branch_name, "/trunk");
        assert_eq!(location.guess_forge(), Some(Forge::SourceForge));
    }
}
