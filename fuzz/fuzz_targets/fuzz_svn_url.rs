#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scmprobe_vcs::{Forge, RepositoryLocation, UrlPolicy, normalize_url, validate_url};

/// Structured input: a URL plus the branch path and policy it is checked under.
#[derive(Debug, Arbitrary)]
struct FuzzLocation {
    url: String,
    branch_name: String,
    public_urls_only: bool,
}

fuzz_target!(|input: FuzzLocation| {
    let policy = UrlPolicy::from_public_only(input.public_urls_only);
    let accepted = validate_url(&input.url, policy).is_ok();

    // Accepted under the public policy implies accepted internally
    if accepted && input.public_urls_only {
        assert!(validate_url(&input.url, UrlPolicy::Internal).is_ok());
    }

    let once = RepositoryLocation::new(input.url.clone())
        .with_branch_name(input.branch_name)
        .with_public_urls_only(input.public_urls_only)
        .normalize();
    let twice = once.clone().normalize();
    assert_eq!(once, twice, "normalize must be idempotent");

    if accepted {
        assert!(validate_url(&normalize_url(&input.url), policy).is_ok());
    }

    let _ = Forge::guess(&input.url);
});
