//! Activity id to span bookkeeping.
//!
//! Lives on the exporter thread and owns every span the engine creates. Ended
//! activities stay in the map so later activities can still use them as
//! parents.

use crate::field::Field;
use crate::kind::{ActivityId, ActivityKind, ResultKind};
use opentelemetry::trace::{TraceContextExt, Tracer as _};
use opentelemetry::{Array, Context as OtelContext, KeyValue, StringValue, Value};
use opentelemetry_sdk::trace::Tracer;
use std::collections::HashMap;
use std::time::SystemTime;

pub const ACTIVITY_KIND: &str = "activity.kind";
pub const RESULT_KIND: &str = "result.kind";
pub const RESULT_FIELDS: &str = "result.fields";

#[derive(Debug, Clone)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub name: String,
    pub parent: Option<ActivityId>,
}

struct ActivityData {
    context: OtelContext,
    /// Span of the current build phase, if one was announced.
    phase: Option<OtelContext>,
}

pub struct SpanMap {
    spans: HashMap<ActivityId, ActivityData>,
    tracer: Tracer,
    root: OtelContext,
}

fn fields_key_value(fields: &[Field]) -> KeyValue {
    KeyValue::new(
        RESULT_FIELDS,
        Value::Array(Array::String(
            fields
                .iter()
                .map(|f| StringValue::from(f.to_string()))
                .collect(),
        )),
    )
}

impl SpanMap {
    pub fn new(tracer: Tracer, root_span_name: String) -> Self {
        let root = OtelContext::new();
        let root = root.with_span(tracer.start_with_context(root_span_name, &root));
        Self {
            spans: HashMap::new(),
            tracer,
            root,
        }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn begin(&mut self, record: ActivityRecord, start_time: SystemTime) {
        let parent_context = record
            .parent
            .and_then(|p| self.spans.get(&p))
            .map(|p| &p.context)
            .unwrap_or(&self.root);

        let span = self
            .tracer
            .span_builder(record.name)
            .with_start_time(start_time)
            .with_attributes(vec![KeyValue::new(ACTIVITY_KIND, record.kind.as_str())])
            .start_with_context(&self.tracer, parent_context);
        let context = parent_context.with_span(span);

        if self
            .spans
            .insert(
                record.id,
                ActivityData {
                    context,
                    phase: None,
                },
            )
            .is_some()
        {
            tracing::debug!(activity = %record.id, "activity id reused; replacing its span");
        }
    }

    pub fn result(&mut self, id: ActivityId, kind: ResultKind, time: SystemTime, fields: Vec<Field>) {
        let Some(data) = self.spans.get_mut(&id) else {
            tracing::trace!(activity = %id, %kind, "result for unknown activity");
            return;
        };

        let attrs = vec![
            KeyValue::new(RESULT_KIND, kind.as_str()),
            fields_key_value(&fields),
        ];

        match kind {
            ResultKind::SetPhase => {
                if let Some(phase) = data.phase.take() {
                    phase.span().end_with_timestamp(time);
                }
                let name = fields
                    .first()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "no phase".to_string());
                let span = self
                    .tracer
                    .span_builder(name)
                    .with_start_time(time)
                    .with_attributes(attrs)
                    .start_with_context(&self.tracer, &data.context);
                data.phase = Some(data.context.with_span(span));
            }
            ResultKind::BuildLogLine | ResultKind::PostBuildLogLine => {
                let line = fields
                    .first()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "(no message)".to_string());
                data.context
                    .span()
                    .add_event_with_timestamp(line, time, attrs);
            }
            kind => data
                .context
                .span()
                .add_event_with_timestamp(kind.as_str(), time, attrs),
        }
    }

    pub fn end(&mut self, id: ActivityId, end_time: SystemTime) {
        let Some(data) = self.spans.get_mut(&id) else {
            tracing::trace!(activity = %id, "end for unknown activity");
            return;
        };
        if let Some(phase) = data.phase.take() {
            phase.span().end_with_timestamp(end_time);
        }
        data.context.span().end_with_timestamp(end_time);
    }

    /// End the process-wide root span.
    pub fn finish(&mut self) {
        self.root.span().end();
    }
}
