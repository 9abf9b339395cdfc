//! Configuration validation.

use crate::error::{ConfigError, Result, ToolProblem};
use crate::types::ScmConfig;

/// Smallest accepted trunk search bound.
pub const MIN_TRUNK_DEPTH: usize = 1;
/// Largest accepted trunk search bound.
pub const MAX_TRUNK_DEPTH: usize = 256;

/// Check a merged configuration.
///
/// # Errors
/// Returns the first problem found.
pub fn validate_config(config: &ScmConfig) -> Result<()> {
    for (field, value) in [
        ("tools.svn", &config.tools.svn),
        ("tools.hg", &config.tools.hg),
        ("tools.cvs", &config.tools.cvs),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::bad_tool(field, ToolProblem::Empty));
        }
        if value.chars().any(char::is_control) {
            return Err(ConfigError::bad_tool(field, ToolProblem::ControlCharacters));
        }
    }

    if !(MIN_TRUNK_DEPTH..=MAX_TRUNK_DEPTH).contains(&config.max_trunk_depth) {
        return Err(ConfigError::TrunkDepth {
            value: config.max_trunk_depth,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ScmConfig::default()).is_ok());
    }

    #[test]
    fn empty_binary_rejected() {
        let config = ScmConfig::default().with_svn("  ");
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::BadTool { ref field, problem: ToolProblem::Empty } if field == "tools.svn"));
    }

    #[test_case(0, false ; "zero")]
    #[test_case(1, true ; "minimum")]
    #[test_case(256, true ; "maximum")]
    #[test_case(257, false ; "above maximum")]
    fn trunk_depth_bounds(depth: usize, ok: bool) {
        let config = ScmConfig::default().with_max_trunk_depth(depth);
        assert_eq!(validate_config(&config).is_ok(), ok);
    }
}
