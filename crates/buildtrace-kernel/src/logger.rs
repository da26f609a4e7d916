//! 日志接口与全局日志器
//! Logging interface and the process-wide logger
//!
//! Every component of the host reports through the logger returned by
//! [`logger`]. Decorators are installed with [`set_logger`], which hands back
//! the logger they replace so it can be restored later.

use crate::activity::{ActivityId, ActivityType, Field, ResultType, Verbosity};
use crate::simple::SimpleLogger;
use parking_lot::RwLock;
use std::io::Write;
use std::sync::Arc;

/// 结构化错误信息
/// Structured error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    /// 错误级别
    /// Error level
    pub level: Verbosity,
    /// 错误消息
    /// Error message
    pub msg: String,
    /// 提示（可选）
    /// Hint (optional)
    pub hint: Option<String>,
    /// 调用轨迹
    /// Traces leading to the error
    pub traces: Vec<String>,
}

impl ErrorInfo {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            level: Verbosity::Error,
            msg: msg.into(),
            hint: None,
            traces: Vec::new(),
        }
    }

    pub fn with_level(mut self, level: Verbosity) -> Self {
        self.level = level;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.traces.push(trace.into());
        self
    }
}

/// 日志器 trait
/// Logger trait
///
/// The full logging capability set of the host. Implementations are shared
/// across the worker threads that report activities, so every method takes
/// `&self`.
pub trait Logger: Send + Sync {
    /// 停止日志器（例如关闭进度条）
    /// Stop the logger (e.g. tear down a progress bar)
    fn stop(&self) {}

    /// 是否处于详细模式
    /// Whether the logger is in verbose mode
    fn is_verbose(&self) -> bool {
        false
    }

    /// 输出一行日志
    /// Emit a log line
    fn log(&self, lvl: Verbosity, msg: &str);

    /// 输出结构化错误
    /// Emit a structured error
    fn log_ei(&self, ei: &ErrorInfo);

    /// 输出警告
    /// Emit a warning
    fn warn(&self, msg: &str) {
        self.log(Verbosity::Warn, &format!("warning: {msg}"));
    }

    /// 活动开始
    /// An activity started
    fn start_activity(
        &self,
        _act: ActivityId,
        _lvl: Verbosity,
        _ty: ActivityType,
        _s: &str,
        _fields: &[Field],
        _parent: ActivityId,
    ) {
    }

    /// 活动结束
    /// An activity stopped
    fn stop_activity(&self, _act: ActivityId) {}

    /// 活动产生结果
    /// An activity produced a result
    fn result(&self, _act: ActivityId, _ty: ResultType, _fields: &[Field]) {}

    /// 写入标准输出
    /// Write a line to stdout
    fn write_to_stdout(&self, s: &str) -> std::io::Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(s.as_bytes())?;
        out.write_all(b"\n")
    }

    /// 交互式提问
    /// Ask the user an interactive question
    fn ask(&self, _msg: &str) -> Option<char> {
        None
    }
}

// 全局日志器
// Global logger
lazy_static::lazy_static! {
    static ref ACTIVE_LOGGER: RwLock<Arc<dyn Logger>> = RwLock::new(Arc::new(SimpleLogger::default()));
}

/// 获取当前日志器
/// Get the active logger
pub fn logger() -> Arc<dyn Logger> {
    ACTIVE_LOGGER.read().clone()
}

/// 替换当前日志器，返回被替换的日志器
/// Replace the active logger, returning the one it replaced
pub fn set_logger(new: Arc<dyn Logger>) -> Arc<dyn Logger> {
    std::mem::replace(&mut *ACTIVE_LOGGER.write(), new)
}
