use buildtrace_engine::{self as engine, ActivityKind, ResultKind};
use buildtrace_kernel::{ActivityType, Field, ResultType, Verbosity};
use parking_lot::Mutex;
use std::sync::Arc;

/// Something a recording logger or engine observed.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SpanStarted {
        id: u64,
        kind: ActivityKind,
        description: String,
        parent: u64,
    },
    SpanEnded {
        id: u64,
    },
    ResultRecorded {
        id: u64,
        kind: ResultKind,
        fields: Vec<engine::Field>,
    },
    EngineShutdown,
    Log {
        level: Verbosity,
        msg: String,
    },
    Warn(String),
    ActivityStarted {
        id: u64,
        ty: ActivityType,
        text: String,
        fields: Vec<Field>,
        parent: u64,
    },
    ActivityStopped {
        id: u64,
    },
    Result {
        id: u64,
        ty: ResultType,
        fields: Vec<Field>,
    },
    Stdout(String),
}

impl Event {
    pub fn is_engine(&self) -> bool {
        matches!(
            self,
            Event::SpanStarted { .. }
                | Event::SpanEnded { .. }
                | Event::ResultRecorded { .. }
                | Event::EngineShutdown
        )
    }
}

/// Shared, ordered record of events.
///
/// A recording engine and a recording logger can share one journal, which
/// makes the interleaving of their calls observable.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    events: Arc<Mutex<Vec<Event>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.events.lock().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Only the events seen by the upstream logger.
    pub fn upstream_events(&self) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|e| !e.is_engine())
            .cloned()
            .collect()
    }

    /// Only the events seen by the engine.
    pub fn engine_events(&self) -> Vec<Event> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.is_engine())
            .cloned()
            .collect()
    }

    pub fn spans_started(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::SpanStarted { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
