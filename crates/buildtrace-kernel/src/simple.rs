//! Default logger writing plain lines to stderr.

use crate::activity::{ActivityId, ActivityType, Field, ResultType, Verbosity};
use crate::logger::{ErrorInfo, Logger};
use std::io::Write;

/// Plain stderr logger used until something else is installed.
#[derive(Debug, Clone)]
pub struct SimpleLogger {
    verbosity: Verbosity,
    print_build_logs: bool,
}

impl Default for SimpleLogger {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Info,
            print_build_logs: false,
        }
    }
}

impl SimpleLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            ..Default::default()
        }
    }

    pub fn with_build_logs(mut self) -> Self {
        self.print_build_logs = true;
        self
    }

    fn emit(&self, line: &str) {
        // stderr going away is not something a logger can report
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }
}

impl Logger for SimpleLogger {
    fn is_verbose(&self) -> bool {
        self.verbosity > Verbosity::Info
    }

    fn log(&self, lvl: Verbosity, msg: &str) {
        if lvl <= self.verbosity {
            self.emit(msg);
        }
    }

    fn log_ei(&self, ei: &ErrorInfo) {
        if ei.level > self.verbosity {
            return;
        }
        self.emit(&format!("error: {}", ei.msg));
        if let Some(hint) = &ei.hint {
            self.emit(&format!("hint: {hint}"));
        }
        for trace in &ei.traces {
            self.emit(&format!("… {trace}"));
        }
    }

    fn start_activity(
        &self,
        _act: ActivityId,
        lvl: Verbosity,
        _ty: ActivityType,
        s: &str,
        _fields: &[Field],
        _parent: ActivityId,
    ) {
        if lvl <= self.verbosity && !s.is_empty() {
            self.log(lvl, &format!("{s}..."));
        }
    }

    fn result(&self, _act: ActivityId, ty: ResultType, fields: &[Field]) {
        if !self.print_build_logs {
            return;
        }
        if let (ResultType::BuildLogLine | ResultType::PostBuildLogLine, Some(line)) =
            (ty, fields.first())
        {
            self.emit(&line.to_string());
        }
    }
}
