use buildtrace_bridge::{BridgeConfig, BridgeError, BridgeInstance};
use buildtrace_kernel::{self as kernel, ActivityId, ActivityType, Field, Logger, ResultType, Verbosity};
use buildtrace_testing::{Event, Journal, RecordingEngine, RecordingLogger, global_logger_lock};
use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn build_one(id: u64) {
    let logger = kernel::logger();
    logger.start_activity(
        ActivityId(id),
        Verbosity::Info,
        ActivityType::Build,
        "building",
        &[],
        ActivityId::ROOT,
    );
    logger.result(ActivityId(id), ResultType::SetPhase, &[Field::from("installPhase")]);
    logger.stop_activity(ActivityId(id));
}

#[test]
fn test_install_teardown_restores_identity() {
    let _guard = global_logger_lock();
    let journal = Journal::new();
    let host: Arc<dyn Logger> = Arc::new(RecordingLogger::new(journal.clone()));
    let original = kernel::set_logger(host.clone());

    let engine = Arc::new(RecordingEngine::new(journal.clone()));
    let bridge = BridgeInstance::install_with_engine(engine.clone()).unwrap();
    build_one(1);
    bridge.teardown();

    assert!(Arc::ptr_eq(&kernel::logger(), &host));
    assert_eq!(Arc::strong_count(&engine), 1);

    let events = journal.events();
    assert_eq!(events.last(), Some(&Event::EngineShutdown));
    assert_eq!(journal.spans_started(), 1);

    // after teardown the host logger is reached directly
    build_one(2);
    assert_eq!(journal.spans_started(), 1);
    assert_eq!(
        journal.events().last(),
        Some(&Event::ActivityStopped { id: 2 })
    );

    kernel::set_logger(original);
}

#[test]
fn test_install_is_exclusive() {
    let _guard = global_logger_lock();

    let first = BridgeInstance::install_with_engine(Arc::new(RecordingEngine::default())).unwrap();
    let second = BridgeInstance::install(&BridgeConfig::default());
    assert!(matches!(second, Err(BridgeError::AlreadyInstalled)));
    first.teardown();

    BridgeInstance::install(&BridgeConfig::default())
        .unwrap()
        .teardown();
}

#[test]
fn test_install_from_config_file_without_endpoint() {
    let _guard = global_logger_lock();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("buildtrace.toml");
    fs::write(&path, "service_name = \"ci-builds\"\n").unwrap();

    let config = BridgeConfig::load_with_env(Some(&path), HashMap::new()).unwrap();
    assert_eq!(config.service_name, "ci-builds");
    assert!(!config.is_enabled());

    let journal = Journal::new();
    let host: Arc<dyn Logger> = Arc::new(RecordingLogger::new(journal.clone()));
    let original = kernel::set_logger(host.clone());

    let bridge = BridgeInstance::install(&config).unwrap();
    build_one(1);
    drop(bridge);

    assert!(Arc::ptr_eq(&kernel::logger(), &host));
    assert_eq!(
        journal.events(),
        vec![
            Event::ActivityStarted {
                id: 1,
                ty: ActivityType::Build,
                text: "building".to_string(),
                fields: vec![],
                parent: 0,
            },
            Event::Result {
                id: 1,
                ty: ResultType::SetPhase,
                fields: vec![Field::from("installPhase")],
            },
            Event::ActivityStopped { id: 1 },
        ]
    );

    kernel::set_logger(original);
}

#[test]
fn test_global_bridge_round_trip() {
    let _guard = global_logger_lock();
    let before = kernel::logger();

    buildtrace_bridge::install_global(&BridgeConfig::default()).unwrap();
    assert!(!Arc::ptr_eq(&kernel::logger(), &before));
    build_one(1);
    buildtrace_bridge::teardown_global();

    assert!(Arc::ptr_eq(&kernel::logger(), &before));
}
