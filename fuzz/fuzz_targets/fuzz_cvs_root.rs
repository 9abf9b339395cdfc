#![no_main]

use libfuzzer_sys::fuzz_target;
use scmprobe_vcs::CvsRoot;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(root) = CvsRoot::parse(input) {
        assert!(root.path.starts_with('/'));
        assert_eq!(root.as_str(), input);
        if root.is_remote() {
            assert!(root.host.as_deref().is_some_and(|h| !h.is_empty()));
        }
    }
});
