//! buildtrace Kernel - Host logging interface
//!
//! This crate defines the logging surface a build/evaluation engine reports
//! its work through:
//! - [`Logger`]: the full logging capability set (plain lines, structured
//!   errors, activities, results, stdout, prompts)
//! - Activity and result types ([`ActivityId`], [`ActivityType`],
//!   [`ResultType`], [`Field`])
//! - The process-wide active logger slot ([`logger`], [`set_logger`])
//!
//! # Example
//!
//! ```rust
//! use buildtrace_kernel::{logger, ActivityId, ActivityType, Verbosity};
//!
//! let log = logger();
//! let act = ActivityId(1);
//! log.start_activity(act, Verbosity::Info, ActivityType::Build, "building foo", &[], ActivityId::ROOT);
//! log.stop_activity(act);
//! ```

pub mod activity;
pub mod logger;
mod simple;

pub use activity::{ActivityId, ActivityType, Field, ResultType, Verbosity};
pub use logger::{ErrorInfo, Logger, logger, set_logger};
pub use simple::SimpleLogger;
