//! Testing utilities for scmprobe.
//!
//! This crate provides a scripted command runner, canned VCS output,
//! generators and assertions for testing resolution logic without a server.
//!
//! # Modules
//!
//! - [`runner`]: [`ScriptedRunner`](runner::ScriptedRunner), a fake svn/cvs/hg client
//! - [`fixtures`]: Canned `svn info`, `svn ls` and `cvs rlog` output
//! - [`proptest_strategies`]: Proptest strategies for URLs and branch paths
//! - [`assertions`]: Domain-specific assertion helpers
//! - [`logging`]: Test-friendly tracing setup
//!
//! # Example
//!
//! ```rust
//! use scmprobe_test_utils::prelude::*;
//! use scmprobe_test_utils::prelude::assert_eq;
//! use scmprobe_vcs::VcsManager;
//! use std::sync::Arc;
//!
//! let runner = Arc::new(
//!     ScriptedRunner::new()
//!         .svn_ls("svn://svn.example.org/repo", SvnFixtures::standard_layout())
//!         .svn_ls("svn://svn.example.org/repo/trunk", "README\nsrc/\n"),
//! );
//! let manager = VcsManager::new().with_runner(runner);
//! let resolved = manager.resolve_svn("svn://svn.example.org/repo", None).unwrap();
//! assert_eq!(resolved.location.url, "svn://svn.example.org/repo/trunk");
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod fixtures;
pub mod logging;
pub mod proptest_strategies;
pub mod runner;

/// Re-export commonly used testing utilities.
pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::fixtures::{CvsFixtures, SvnFixtures};
    pub use crate::logging::init_test_tracing;
    pub use crate::proptest_strategies::*;
    pub use crate::runner::ScriptedRunner;

    // Re-export common testing crates
    pub use pretty_assertions::{assert_eq, assert_ne};
    pub use proptest::prelude::*;
}
