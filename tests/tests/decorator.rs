use buildtrace_bridge::OtelLogger;
use buildtrace_engine::{self as engine, ActivityKind, Context, ResultKind, TelemetryEngine};
use buildtrace_kernel::{ActivityId, ActivityType, ErrorInfo, Field, Logger, ResultType, Verbosity};
use buildtrace_testing::{Event, Journal, PanickingEngine, RecordingEngine, RecordingLogger};
use std::sync::Arc;

fn recording() -> (OtelLogger, Journal) {
    let journal = Journal::new();
    let logger = OtelLogger::new(
        Arc::new(RecordingLogger::new(journal.clone())),
        Arc::new(RecordingEngine::new(journal.clone())),
    );
    (logger, journal)
}

fn decorate(engine: Arc<dyn TelemetryEngine>) -> (OtelLogger, Journal) {
    let journal = Journal::new();
    let logger = OtelLogger::new(Arc::new(RecordingLogger::new(journal.clone())), engine);
    (logger, journal)
}

/// A small build: a build activity with a nested download, phases, log lines
/// and an activity type the engine has never heard of.
fn host_session(logger: &dyn Logger) {
    logger.log(Verbosity::Info, "evaluating derivation");
    logger.start_activity(
        ActivityId(1),
        Verbosity::Info,
        ActivityType::Build,
        "building hello",
        &[Field::from("/nix/store/hello.drv")],
        ActivityId(100),
    );
    logger.start_activity(
        ActivityId(2),
        Verbosity::Talkative,
        ActivityType::FileTransfer,
        "downloading source",
        &[],
        ActivityId(1),
    );
    logger.result(ActivityId(2), ResultType::Progress, &[Field::Int(10), Field::Int(100)]);
    logger.stop_activity(ActivityId(2));
    logger.result(ActivityId(1), ResultType::SetPhase, &[Field::from("buildPhase")]);
    logger.result(ActivityId(1), ResultType::BuildLogLine, &[Field::from("make all")]);
    logger.warn("build log is large");
    logger.start_activity(
        ActivityId(3),
        Verbosity::Info,
        ActivityType::FetchTree,
        "fetching tree",
        &[],
        ActivityId(1),
    );
    logger.result(ActivityId(3), ResultType::FetchStatus, &[]);
    logger.stop_activity(ActivityId(3));
    logger.stop_activity(ActivityId(1));
    logger.log_ei(&ErrorInfo::new("warning only").with_level(Verbosity::Warn));
    let _ = logger.write_to_stdout("/nix/store/hello\n");
}

#[test]
fn test_start_and_stop_reach_engine_before_upstream() {
    let (logger, journal) = recording();

    logger.start_activity(
        ActivityId(1),
        Verbosity::Info,
        ActivityType::Build,
        "build",
        &[],
        ActivityId::ROOT,
    );
    logger.stop_activity(ActivityId(1));

    assert_eq!(
        journal.events(),
        vec![
            Event::SpanStarted {
                id: 1,
                kind: ActivityKind::Build,
                description: "build".to_string(),
                parent: 0,
            },
            Event::ActivityStarted {
                id: 1,
                ty: ActivityType::Build,
                text: "build".to_string(),
                fields: vec![],
                parent: 0,
            },
            Event::SpanEnded { id: 1 },
            Event::ActivityStopped { id: 1 },
        ]
    );
}

#[test]
fn test_result_fields_reach_engine_in_order() {
    let (logger, journal) = recording();
    let fields = vec![Field::Int(3), Field::from("phase")];

    logger.result(ActivityId(5), ResultType::SetPhase, &fields);

    assert_eq!(
        journal.events(),
        vec![
            Event::ResultRecorded {
                id: 5,
                kind: ResultKind::SetPhase,
                fields: vec![engine::Field::Num(3), engine::Field::String("phase".to_string())],
            },
            Event::Result {
                id: 5,
                ty: ResultType::SetPhase,
                fields,
            },
        ]
    );
}

#[test]
fn test_nested_activities_keep_parents_and_closing_order() {
    let (logger, journal) = recording();

    logger.start_activity(
        ActivityId(1),
        Verbosity::Info,
        ActivityType::Build,
        "outer",
        &[],
        ActivityId(100),
    );
    logger.start_activity(
        ActivityId(2),
        Verbosity::Info,
        ActivityType::Substitute,
        "inner",
        &[],
        ActivityId(1),
    );
    logger.stop_activity(ActivityId(2));
    logger.stop_activity(ActivityId(1));

    let engine_events = journal.engine_events();
    assert_eq!(
        engine_events,
        vec![
            Event::SpanStarted {
                id: 1,
                kind: ActivityKind::Build,
                description: "outer".to_string(),
                parent: 100,
            },
            Event::SpanStarted {
                id: 2,
                kind: ActivityKind::Substitute,
                description: "inner".to_string(),
                parent: 1,
            },
            Event::SpanEnded { id: 2 },
            Event::SpanEnded { id: 1 },
        ]
    );
    buildtrace_testing::assert_spans_started!(journal, 2);
}

#[test]
fn test_unrecognized_types_are_recorded_as_unknown() {
    let (logger, journal) = recording();
    host_session(&logger);

    let unknown: Vec<_> = journal
        .engine_events()
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                Event::SpanStarted {
                    kind: ActivityKind::Unknown,
                    ..
                } | Event::ResultRecorded {
                    kind: ResultKind::Unknown,
                    ..
                }
            )
        })
        .collect();
    assert_eq!(unknown.len(), 2);

    // the host still sees its own types
    assert!(journal.upstream_events().contains(&Event::ActivityStarted {
        id: 3,
        ty: ActivityType::FetchTree,
        text: "fetching tree".to_string(),
        fields: vec![],
        parent: 1,
    }));
}

#[test]
fn test_pass_through_is_identical_with_any_engine() {
    let bare_journal = Journal::new();
    host_session(&RecordingLogger::new(bare_journal.clone()));
    let expected = bare_journal.events();

    let engines: Vec<Arc<dyn TelemetryEngine>> = vec![
        Arc::new(Context::disabled()),
        Arc::new(RecordingEngine::default()),
        Arc::new(PanickingEngine),
    ];
    for engine in engines {
        let (logger, journal) = decorate(engine.clone());
        host_session(&logger);
        assert_eq!(journal.upstream_events(), expected);
        engine.shutdown();
    }
}

#[test]
fn test_pass_through_with_active_engine() {
    let context = Arc::new(Context::initialize_from(Some("http://127.0.0.1:9"), None).unwrap());
    let (logger, journal) = decorate(context.clone());

    host_session(&logger);
    context.deinitialize();

    let bare_journal = Journal::new();
    host_session(&RecordingLogger::new(bare_journal.clone()));
    assert_eq!(journal.upstream_events(), bare_journal.events());
}

#[test]
fn test_interactive_calls_return_upstream_answers() {
    let journal = Journal::new();
    let logger = OtelLogger::new(
        Arc::new(RecordingLogger::new(journal.clone()).with_reply('y')),
        Arc::new(RecordingEngine::new(journal.clone())),
    );

    assert_eq!(logger.ask("continue?"), Some('y'));
    assert!(logger.is_verbose());
    logger.write_to_stdout("done\n").unwrap();
    assert_eq!(journal.events(), vec![Event::Stdout("done\n".to_string())]);
}
