//! Tracing setup for tests.

use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `warn` so trunk-search noise stays out of
/// test output unless asked for.
pub fn init_test_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .from_env_lossy();

    // Another test may have installed it already.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_test_writer()
        .try_init();
}
