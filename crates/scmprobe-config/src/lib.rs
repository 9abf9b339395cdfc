//! Configuration for scmprobe.
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. Built-in defaults ([`ScmConfig::default`])
//! 2. An optional JSON configuration file
//! 3. `SCMPROBE_*` environment variables
//!
//! The merged result is validated before it is handed out.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod env;
pub mod error;
pub mod loader;
pub mod types;
pub mod validate;

pub use env::{EnvConfig, ScmEnvVar};
pub use error::{ConfigError, Result, ToolProblem};
pub use loader::{ConfigLoader, ConfigSource};
pub use types::{ScmConfig, ToolPaths};
pub use validate::validate_config;
