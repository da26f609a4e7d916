//! 导出线程
//! Exporter thread
//!
//! 所有 Span 状态都在专用线程上维护，调用方只发送消息
//! All span state lives on a dedicated thread; callers only send messages

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::field::Field;
use crate::kind::{ActivityId, ResultKind};
use crate::span_map::{ActivityRecord, SpanMap};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{WithExportConfig, WithTonicConfig};
use opentelemetry_sdk::trace::TracerProvider;
use opentelemetry_sdk::{Resource, runtime};
use std::time::{Duration, SystemTime};
use std::sync::mpsc::SyncSender;
use tokio::sync::mpsc;
use tonic::metadata::{AsciiMetadataKey, AsciiMetadataValue, MetadataMap};
use tracing::{debug, error, warn};

/// 环境变量中的默认请求头
/// Default headers from the environment
pub const HEADERS_ENV: &str = "OTEL_EXPORTER_OTLP_HEADERS";

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// 发送到导出线程的消息
/// Message sent to the exporter thread
#[derive(Debug)]
pub enum Message {
    BeginActivity(ActivityRecord, SystemTime),
    EndActivity(ActivityId, SystemTime),
    Result(ActivityId, ResultKind, SystemTime, Vec<Field>),
    Terminate,
}

/// 解析 `k=v,k2=v2` 格式的请求头，跳过无效项
/// Parse `k=v,k2=v2` headers, skipping malformed pairs
pub fn parse_headers(headers: &str) -> MetadataMap {
    let mut map = MetadataMap::new();
    headers
        .split(',')
        .filter_map(|part| {
            let (key, value) = part.split_once('=')?;
            Some((
                AsciiMetadataKey::from_bytes(key.trim().as_bytes()).ok()?,
                AsciiMetadataValue::try_from(value.trim()).ok()?,
            ))
        })
        .for_each(|(key, value)| {
            map.insert(key, value);
        });
    map
}

/// Configured headers win; an empty setting falls back to `HEADERS_ENV`.
fn resolve_headers(configured: &str, lookup: impl Fn(&str) -> Option<String>) -> MetadataMap {
    if !configured.trim().is_empty() {
        return parse_headers(configured);
    }
    lookup(HEADERS_ENV)
        .map(|h| parse_headers(&h))
        .unwrap_or_default()
}

fn build_provider(config: &EngineConfig) -> EngineResult<TracerProvider> {
    let endpoint = config.endpoint.clone().unwrap_or_default();
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .with_metadata(resolve_headers(&config.headers, |key| std::env::var(key).ok()))
        .build()
        .map_err(|e| EngineError::Exporter(e.to_string()))?;

    let resource = Resource::new([KeyValue::new(
        "service.name",
        config.service_name.clone(),
    )]);

    Ok(TracerProvider::builder()
        .with_batch_exporter(exporter, runtime::Tokio)
        .with_resource(resource)
        .build())
}

fn process_message(message: Message, span_map: &mut SpanMap) {
    match message {
        Message::BeginActivity(record, time) => span_map.begin(record, time),
        Message::EndActivity(id, time) => span_map.end(id, time),
        Message::Result(id, kind, time, fields) => span_map.result(id, kind, time, fields),
        Message::Terminate => {}
    }
}

async fn run(
    config: EngineConfig,
    mut recv: mpsc::UnboundedReceiver<Message>,
    ready: SyncSender<EngineResult<()>>,
) -> Option<TracerProvider> {
    let provider = match build_provider(&config) {
        Ok(provider) => provider,
        Err(e) => {
            let _ = ready.send(Err(e));
            return None;
        }
    };
    let _ = ready.send(Ok(()));

    let tracer = provider.tracer(config.service_name.clone());
    let mut span_map = SpanMap::new(tracer, config.root_span_name());

    loop {
        match recv.recv().await {
            None | Some(Message::Terminate) => {
                recv.close();
                break;
            }
            Some(message) => process_message(message, &mut span_map),
        }
    }

    if span_map.is_empty() {
        debug!("exporter loop finished without activities");
    } else {
        debug!(activities = span_map.len(), "exporter loop finished");
    }
    span_map.finish();
    Some(provider)
}

/// 导出线程入口
/// Exporter thread entry point
pub(crate) fn exporter_main(
    config: EngineConfig,
    recv: mpsc::UnboundedReceiver<Message>,
    ready: SyncSender<EngineResult<()>>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name("buildtrace-otel")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let _ = ready.send(Err(EngineError::Runtime(e)));
            return;
        }
    };

    let Some(provider) = runtime.block_on(run(config, recv, ready)) else {
        return;
    };

    // outside block_on so the batch processor's task can still be driven
    if let Err(e) = provider.shutdown() {
        warn!("failed to flush spans on shutdown: {e}");
    }
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
}
