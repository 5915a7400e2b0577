//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honours `RUST_LOG`; falls back to `info` when it is unset. Safe to call
/// more than once (later calls are ignored), which keeps tests that share a
/// process from panicking.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

/// Initialize logging for tests, routing output through the test harness
pub fn init_for_tests() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .parse_default_env()
        .try_init();
}
