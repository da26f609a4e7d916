//! 遥测引擎句柄
//! Telemetry engine handle
//!
//! `Context` 是进程内唯一的引擎会话，创建于启动、销毁于退出
//! `Context` is the single engine session of a process, created at startup
//! and destroyed at exit

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::exporter::{Message, exporter_main};
use crate::field::{FfiField, unmarshal_fields};
use crate::kind::{ActivityId, ActivityKind, ResultKind};
use crate::span_map::ActivityRecord;
use parking_lot::{Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::SystemTime;
use std::sync::mpsc as std_mpsc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace};

/// 遥测引擎 trait
/// Telemetry engine trait
///
/// The operations a logger decorator drives. All of them are synchronous,
/// must return promptly, and absorb their own failures.
pub trait TelemetryEngine: Send + Sync {
    /// 开始一个 Span
    /// Start a span for an activity
    fn start_span(&self, id: ActivityId, kind: ActivityKind, description: &str, parent: ActivityId);

    /// 结束一个 Span
    /// End the span of an activity
    fn end_span(&self, id: ActivityId);

    /// 记录活动结果；`fields` 只在本次调用期间有效
    /// Record an activity result; `fields` are only valid for this call
    fn record_result(&self, id: ActivityId, kind: ResultKind, fields: &[FfiField<'_>]);

    /// 关闭引擎
    /// Shut the engine down
    fn shutdown(&self);
}

/// 引擎状态
/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// 无端点，所有调用都被丢弃
    /// No endpoint; every call is discarded
    Disabled,
    /// 正在记录
    /// Recording
    Active,
    /// 已关闭（终态）
    /// Shut down (terminal)
    ShutDown,
}

enum State {
    Disabled,
    Active(mpsc::UnboundedSender<Message>),
    ShutDown,
}

/// 遥测引擎上下文
/// Telemetry engine context
pub struct Context {
    state: RwLock<State>,
    exporter_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Context {
    /// 启动引擎
    /// Start the engine
    ///
    /// Without an endpoint the context is created disabled and no thread is
    /// started. Otherwise this blocks until the exporter thread reports
    /// readiness; that wait does not depend on a runtime, so it is safe from
    /// inside one.
    pub fn initialize(config: EngineConfig) -> EngineResult<Self> {
        if !config.is_enabled() {
            debug!("no OTLP endpoint configured; telemetry disabled");
            return Ok(Self::disabled());
        }

        let endpoint = config.endpoint.clone().unwrap_or_default();
        let (send, recv) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std_mpsc::sync_channel(1);

        let exporter_thread = thread::Builder::new()
            .name("buildtrace-exporter".to_owned())
            .spawn(move || exporter_main(config, recv, ready_tx))
            .map_err(EngineError::ThreadSpawn)?;

        let startup = match ready_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(EngineError::StartupAborted),
        };
        if let Err(e) = startup {
            let _ = exporter_thread.join();
            return Err(e);
        }

        info!(%endpoint, "telemetry engine started");
        Ok(Self {
            state: RwLock::new(State::Active(send)),
            exporter_thread: Mutex::new(Some(exporter_thread)),
        })
    }

    /// 以边界参数启动引擎
    /// Start the engine from the two boundary settings
    pub fn initialize_from(endpoint: Option<&str>, headers: Option<&str>) -> EngineResult<Self> {
        let mut config = EngineConfig::new();
        if let Some(endpoint) = endpoint {
            config = config.with_endpoint(endpoint);
        }
        if let Some(headers) = headers {
            config = config.with_headers(headers);
        }
        Self::initialize(config)
    }

    /// 创建禁用的上下文
    /// Create a disabled context
    pub fn disabled() -> Self {
        Self {
            state: RwLock::new(State::Disabled),
            exporter_thread: Mutex::new(None),
        }
    }

    pub fn state(&self) -> ContextState {
        match &*self.state.read() {
            State::Disabled => ContextState::Disabled,
            State::Active(_) => ContextState::Active,
            State::ShutDown => ContextState::ShutDown,
        }
    }

    /// 关闭引擎：通知导出线程并等待其退出
    /// Shut down: tell the exporter thread to finish and wait for it
    ///
    /// Later calls on this context are discarded. Calling it again is a no-op.
    pub fn deinitialize(&self) {
        let previous = std::mem::replace(&mut *self.state.write(), State::ShutDown);
        if let State::Active(sender) = previous {
            if sender.send(Message::Terminate).is_err() {
                debug!("exporter thread already gone at shutdown");
            }
        }

        // can't force the thread to stop, but we can wait for it
        if let Some(handle) = self.exporter_thread.lock().take() {
            if handle.join().is_err() {
                error!("exporter thread panicked");
            }
        }
    }

    /// Build and send a message if the engine is recording.
    fn tell(&self, make: impl FnOnce() -> Message) {
        if let State::Active(sender) = &*self.state.read() {
            if sender.send(make()).is_err() {
                trace!("exporter thread gone; dropping message");
            }
        }
    }

    pub fn start_span(&self, id: ActivityId, kind: ActivityKind, description: &str, parent: ActivityId) {
        self.tell(|| {
            Message::BeginActivity(
                ActivityRecord {
                    id,
                    kind,
                    name: description.to_owned(),
                    parent: (parent != ActivityId::ROOT).then_some(parent),
                },
                SystemTime::now(),
            )
        });
    }

    pub fn end_span(&self, id: ActivityId) {
        self.tell(|| Message::EndActivity(id, SystemTime::now()));
    }

    pub fn record_result(&self, id: ActivityId, kind: ResultKind, fields: &[FfiField<'_>]) {
        self.tell(|| Message::Result(id, kind, SystemTime::now(), unmarshal_fields(fields)));
    }
}

impl TelemetryEngine for Context {
    fn start_span(&self, id: ActivityId, kind: ActivityKind, description: &str, parent: ActivityId) {
        Context::start_span(self, id, kind, description, parent);
    }

    fn end_span(&self, id: ActivityId) {
        Context::end_span(self, id);
    }

    fn record_result(&self, id: ActivityId, kind: ResultKind, fields: &[FfiField<'_>]) {
        Context::record_result(self, id, kind, fields);
    }

    fn shutdown(&self) {
        self.deinitialize();
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.deinitialize();
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("state", &self.state())
            .finish()
    }
}
