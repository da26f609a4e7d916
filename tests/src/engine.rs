use crate::journal::{Event, Journal};
use buildtrace_engine::{
    ActivityId, ActivityKind, FfiField, ResultKind, TelemetryEngine, unmarshal_fields,
};

/// An engine that writes every call into a [`Journal`].
///
/// Result fields are copied out of their borrowed views before the call
/// returns, the same way the real engine does.
#[derive(Debug, Clone, Default)]
pub struct RecordingEngine {
    journal: Journal,
}

impl RecordingEngine {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

impl TelemetryEngine for RecordingEngine {
    fn start_span(&self, id: ActivityId, kind: ActivityKind, description: &str, parent: ActivityId) {
        self.journal.push(Event::SpanStarted {
            id: id.0,
            kind,
            description: description.to_string(),
            parent: parent.0,
        });
    }

    fn end_span(&self, id: ActivityId) {
        self.journal.push(Event::SpanEnded { id: id.0 });
    }

    fn record_result(&self, id: ActivityId, kind: ResultKind, fields: &[FfiField<'_>]) {
        self.journal.push(Event::ResultRecorded {
            id: id.0,
            kind,
            fields: unmarshal_fields(fields),
        });
    }

    fn shutdown(&self) {
        self.journal.push(Event::EngineShutdown);
    }
}

/// An engine whose span operations always panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanickingEngine;

impl TelemetryEngine for PanickingEngine {
    fn start_span(&self, _: ActivityId, _: ActivityKind, _: &str, _: ActivityId) {
        panic!("start_span failed");
    }

    fn end_span(&self, _: ActivityId) {
        panic!("end_span failed");
    }

    fn record_result(&self, _: ActivityId, _: ResultKind, _: &[FfiField<'_>]) {
        panic!("record_result failed");
    }

    fn shutdown(&self) {}
}
