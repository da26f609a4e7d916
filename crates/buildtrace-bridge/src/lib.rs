//! buildtrace Bridge - host activities as OpenTelemetry spans
//!
//! 本 crate 将宿主日志器的活动事件转发到遥测引擎:
//! This crate forwards the host logger's activity events to the telemetry
//! engine:
//! - 类型映射：宿主活动/结果类型到引擎种类
//! - Type mapping: host activity/result types to engine kinds
//! - 字段编组：宿主字段到借用视图
//! - Field marshalling: host fields to borrowed views
//! - 装饰器：先驱动引擎，再原样转发
//! - Decorator: drive the engine first, then forward unchanged
//! - 安装与卸载
//! - Installation and teardown
//!
//! # Example
//!
//! ```rust,no_run
//! use buildtrace_bridge::{BridgeConfig, BridgeInstance};
//!
//! let config = BridgeConfig::load(None)?;
//! let bridge = BridgeInstance::install(&config)?;
//! // ... the host runs its build ...
//! bridge.teardown();
//! # Ok::<(), buildtrace_bridge::BridgeError>(())
//! ```

mod config;
mod error;
mod instance;
mod logger;
mod logging;
mod mapping;
mod marshal;

pub use config::{BridgeConfig, ENV_PREFIX, OTEL_ENDPOINT_ENV};
pub use error::{BridgeError, BridgeResult};
pub use instance::{BridgeInstance, install_global, teardown_global};
pub use logger::OtelLogger;
pub use logging::{LOG_ENV, init_logging};
pub use mapping::{map_activity_id, map_activity_type, map_result_type};
pub use marshal::{marshal_field, marshal_fields};
