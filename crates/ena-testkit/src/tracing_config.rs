//! Tracing setup for tests.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for test output.
///
/// Safe to call from every test; only the first call installs a subscriber.
/// Honors `RUST_LOG`, defaulting to `info`.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}
