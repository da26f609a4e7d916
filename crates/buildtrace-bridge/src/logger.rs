//! Logger decorator that reports activities to the telemetry engine.
//!
//! [`OtelLogger`] wraps the logger that was active before it and implements the
//! whole [`Logger`] surface. Only `start_activity`, `stop_activity` and `result`
//! touch the engine; they do so first and then forward the untouched call.
//! Everything else is forwarded as is.

use crate::mapping::{map_activity_id, map_activity_type, map_result_type};
use crate::marshal::marshal_fields;
use buildtrace_engine::TelemetryEngine;
use buildtrace_kernel::{
    ActivityId, ActivityType, ErrorInfo, Field, Logger, ResultType, Verbosity,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

pub struct OtelLogger {
    upstream: Arc<dyn Logger>,
    engine: Arc<dyn TelemetryEngine>,
}

impl OtelLogger {
    pub fn new(upstream: Arc<dyn Logger>, engine: Arc<dyn TelemetryEngine>) -> Self {
        Self { upstream, engine }
    }

    /// The logger every call is forwarded to.
    pub fn upstream(&self) -> &Arc<dyn Logger> {
        &self.upstream
    }

    pub fn engine(&self) -> &Arc<dyn TelemetryEngine> {
        &self.engine
    }

    /// Run an engine call; a panic in it must not stop the pass-through.
    fn guarded(&self, op: &'static str, f: impl FnOnce(&dyn TelemetryEngine)) {
        let engine = self.engine.as_ref();
        if catch_unwind(AssertUnwindSafe(|| f(engine))).is_err() {
            tracing::warn!(op, "telemetry engine panicked; event not recorded");
        }
    }
}

impl Logger for OtelLogger {
    fn stop(&self) {
        self.upstream.stop();
    }

    fn is_verbose(&self) -> bool {
        self.upstream.is_verbose()
    }

    fn log(&self, lvl: Verbosity, msg: &str) {
        self.upstream.log(lvl, msg);
    }

    fn log_ei(&self, ei: &ErrorInfo) {
        self.upstream.log_ei(ei);
    }

    fn warn(&self, msg: &str) {
        self.upstream.warn(msg);
    }

    // start-time fields are not sent to the engine; only results carry fields
    fn start_activity(
        &self,
        act: ActivityId,
        lvl: Verbosity,
        ty: ActivityType,
        s: &str,
        fields: &[Field],
        parent: ActivityId,
    ) {
        self.guarded("start_span", |engine| {
            engine.start_span(
                map_activity_id(act),
                map_activity_type(ty),
                s,
                map_activity_id(parent),
            )
        });
        self.upstream
            .start_activity(act, lvl, ty, s, fields, parent);
    }

    fn stop_activity(&self, act: ActivityId) {
        self.guarded("end_span", |engine| engine.end_span(map_activity_id(act)));
        self.upstream.stop_activity(act);
    }

    fn result(&self, act: ActivityId, ty: ResultType, fields: &[Field]) {
        self.guarded("record_result", |engine| {
            let views = marshal_fields(fields);
            engine.record_result(map_activity_id(act), map_result_type(ty), &views);
        });
        self.upstream.result(act, ty, fields);
    }

    fn write_to_stdout(&self, s: &str) -> std::io::Result<()> {
        self.upstream.write_to_stdout(s)
    }

    fn ask(&self, msg: &str) -> Option<char> {
        self.upstream.ask(msg)
    }
}
