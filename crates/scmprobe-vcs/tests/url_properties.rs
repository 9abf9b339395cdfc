//! Property tests for URL validation and normalization.

use proptest::prelude::*;
use scmprobe_test_utils::proptest_strategies::*;
use scmprobe_vcs::{
    Forge, RepositoryLocation, UrlPolicy, UrlRejection, normalize_branch_name, normalize_url,
    validate_url,
};

const POLICIES: [UrlPolicy; 2] = [UrlPolicy::PublicOnly, UrlPolicy::Internal];

proptest! {
    #[test]
    fn well_formed_urls_pass_under_every_policy(url in valid_svn_url_strategy()) {
        for policy in POLICIES {
            prop_assert_eq!(validate_url(&url, policy), Ok(()), "{}", url);
        }
    }

    #[test]
    fn usernames_fail_under_every_policy(url in url_with_username_strategy()) {
        for policy in POLICIES {
            prop_assert_eq!(validate_url(&url, policy), Err(UrlRejection::EmbeddedUsername));
        }
    }

    #[test]
    fn whitespace_fails_under_every_policy(url in url_with_whitespace_strategy()) {
        for policy in POLICIES {
            prop_assert_eq!(validate_url(&url, policy), Err(UrlRejection::ContainsWhitespace));
        }
    }

    #[test]
    fn foreign_schemes_fail(url in foreign_scheme_url_strategy()) {
        for policy in POLICIES {
            let rejected = matches!(
                validate_url(&url, policy),
                Err(UrlRejection::ForeignProtocol { .. })
            );
            prop_assert!(rejected, "{}", url);
        }
    }

    #[test]
    fn malformed_ports_fail(url in malformed_port_url_strategy()) {
        for policy in POLICIES {
            prop_assert_eq!(validate_url(&url, policy), Err(UrlRejection::MalformedPort));
        }
    }

    #[test]
    fn local_paths_depend_on_policy(path in repo_path_strategy()) {
        let url = format!("file://{path}");
        prop_assert_eq!(
            validate_url(&url, UrlPolicy::PublicOnly),
            Err(UrlRejection::LocalPathNotAllowed)
        );
        prop_assert_eq!(validate_url(&url, UrlPolicy::Internal), Ok(()));
    }

    #[test]
    fn normalize_is_idempotent(
        url in valid_svn_url_strategy(),
        branch in branch_name_strategy()
    ) {
        let once = RepositoryLocation::new(url).with_branch_name(branch).normalize();
        let twice = once.clone().normalize();
        prop_assert_eq!(&once, &twice);
        prop_assert!(!once.branch_name.ends_with('/'));
    }

    #[test]
    fn normalized_urls_stay_valid(url in valid_svn_url_strategy()) {
        let normalized = normalize_url(&url);
        prop_assert_eq!(validate_url(&normalized, UrlPolicy::PublicOnly), Ok(()));
    }

    #[test]
    fn sourceforge_http_becomes_https(
        project in "[a-z][a-z0-9]{1,12}",
        path in repo_path_strategy()
    ) {
        let url = format!("http://{project}.svn.sourceforge.net{path}");
        let normalized = normalize_url(&url);
        let expected = format!("https://{project}.svn.sourceforge.net{path}");
        prop_assert_eq!(normalized.as_ref(), expected.as_str());
        prop_assert_eq!(Forge::guess(&normalized), Some(Forge::SourceForge));
    }

    #[test]
    fn branch_normalization_never_panics(branch in ".*") {
        let normalized = normalize_branch_name(&branch);
        prop_assert!(branch.starts_with(normalized));
    }
}
