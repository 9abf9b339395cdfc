//! Proptest strategies for scmprobe inputs.
//!
//! This module provides strategies for generating repository URLs, both
//! well-formed and broken in one specific way, plus branch paths.

use proptest::prelude::*;

/// Strategy for accepted schemes.
pub fn scheme_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("http"), Just("https"), Just("svn")]
}

/// Strategy for generating hostnames.
pub fn host_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9-]{0,10}", 1..4).prop_map(|labels| {
        let mut host = labels.join(".");
        host.push_str(".org");
        host
    })
}

/// Strategy for path segments from the accepted character set.
pub fn path_segment_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_][A-Za-z0-9_.+~^-]{0,12}"
}

/// Strategy for absolute repository paths, e.g. `/svnroot/project`.
pub fn repo_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(path_segment_strategy(), 0..5)
        .prop_map(|segments| format!("/{}", segments.join("/")))
}

/// Strategy for URLs the validator accepts under every policy.
pub fn valid_svn_url_strategy() -> impl Strategy<Value = String> {
    (
        scheme_strategy(),
        host_strategy(),
        prop::option::of(1u16..),
        repo_path_strategy(),
    )
        .prop_map(|(scheme, host, port, path)| match port {
            Some(port) => format!("{scheme}://{host}:{port}{path}"),
            None => format!("{scheme}://{host}{path}"),
        })
}

/// Strategy for URLs carrying a username in the authority.
pub fn url_with_username_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{1,8}", scheme_strategy(), host_strategy(), repo_path_strategy())
        .prop_map(|(user, scheme, host, path)| format!("{scheme}://{user}@{host}{path}"))
}

/// Strategy for otherwise valid URLs with whitespace spliced in.
pub fn url_with_whitespace_strategy() -> impl Strategy<Value = String> {
    let whitespace = prop_oneof![Just(' '), Just('\t'), Just('\n')];
    (valid_svn_url_strategy(), whitespace, any::<prop::sample::Index>())
        .prop_map(|(url, ws, index)| {
            let at = index.index(url.len() + 1);
            let mut broken = url;
            broken.insert(at, ws);
            broken
        })
}

/// Strategy for URLs using another VCS's scheme.
pub fn foreign_scheme_url_strategy() -> impl Strategy<Value = String> {
    let scheme = prop_oneof![Just("git"), Just("hg"), Just("bzr"), Just("cvs"), Just("git+ssh")];
    (scheme, host_strategy(), repo_path_strategy())
        .prop_map(|(scheme, host, path)| format!("{scheme}://{host}{path}"))
}

/// Strategy for URLs whose port is not a number.
pub fn malformed_port_url_strategy() -> impl Strategy<Value = String> {
    (scheme_strategy(), host_strategy(), "[a-z]{1,5}", repo_path_strategy())
        .prop_map(|(scheme, host, port, path)| format!("{scheme}://{host}:{port}{path}"))
}

/// Strategy for branch paths, with or without trailing separators.
pub fn branch_name_strategy() -> impl Strategy<Value = String> {
    (repo_path_strategy(), 0usize..3).prop_map(|(path, slashes)| {
        let mut branch = if path == "/" { String::new() } else { path };
        branch.push_str(&"/".repeat(slashes));
        branch
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn valid_urls_look_like_urls() {
        let mut runner = TestRunner::default();
        for _ in 0..32 {
            let url = valid_svn_url_strategy()
                .new_tree(&mut runner)
                .unwrap()
                .current();
            assert!(url.contains("://"), "{url}");
            assert!(!url.contains('@'), "{url}");
        }
    }
}
