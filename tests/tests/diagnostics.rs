//! Runs in its own process: it installs the global `tracing` subscriber.

use buildtrace_bridge::{BridgeConfig, BridgeInstance, LOG_ENV};

#[test]
fn test_log_env_enables_diagnostics_on_install() {
    // SAFETY: the only test in this binary; no other thread reads the environment.
    unsafe { std::env::set_var(LOG_ENV, "buildtrace_bridge=debug") };
    assert!(!tracing::dispatcher::has_been_set());

    let config = BridgeConfig::default();
    assert!(config.log_filter.is_none());
    let bridge = BridgeInstance::install(&config).unwrap();
    assert!(tracing::dispatcher::has_been_set());

    bridge.teardown();
}
