//! buildtrace Engine - OpenTelemetry span recording
//!
//! 本 crate 实现遥测引擎，通过不透明句柄 [`Context`] 提供服务:
//! This crate implements the telemetry engine, served through the opaque
//! [`Context`] handle:
//! - 活动开始/结束映射为 Span
//! - Activity start/stop mapped to spans
//! - 结果映射为 Span 事件或阶段子 Span
//! - Results mapped to span events or phase child spans
//! - 通过 OTLP/gRPC 批量导出
//! - Batched export over OTLP/gRPC
//!
//! # Example
//!
//! ```rust,no_run
//! use buildtrace_engine::{ActivityId, ActivityKind, Context, EngineConfig, FfiField, ResultKind};
//!
//! let cx = Context::initialize(EngineConfig::new().with_endpoint("http://localhost:4317"))?;
//! cx.start_span(ActivityId(1), ActivityKind::Build, "building hello", ActivityId::ROOT);
//! cx.record_result(ActivityId(1), ResultKind::SetPhase, &[FfiField::string("buildPhase")]);
//! cx.end_span(ActivityId(1));
//! cx.deinitialize();
//! # Ok::<(), buildtrace_engine::EngineError>(())
//! ```

mod config;
mod context;
mod error;
mod exporter;
mod field;
mod kind;
mod span_map;

pub use config::EngineConfig;
pub use context::{Context, ContextState, TelemetryEngine};
pub use error::{EngineError, EngineResult};
pub use exporter::{HEADERS_ENV, parse_headers};
pub use field::{FfiField, FfiString, Field, FieldTag, unmarshal_fields};
pub use kind::{ActivityId, ActivityKind, ResultKind};
pub use span_map::{ACTIVITY_KIND, RESULT_FIELDS, RESULT_KIND};
