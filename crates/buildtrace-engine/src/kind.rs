//! 边界枚举
//! Boundary enumerations
//!
//! These are versioned independently of the host's types. Raw values that are
//! not recognized decode to `Unknown` instead of failing.

use std::fmt;

/// 活动标识符
/// Activity identifier, as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct ActivityId(pub u64);

impl ActivityId {
    /// 根标记：没有父活动
    /// Root marker: no parent activity
    pub const ROOT: ActivityId = ActivityId(0);
}

impl fmt::Display for ActivityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 活动类型
/// Activity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ActivityKind {
    #[default]
    Unknown = 0,
    CopyPath = 100,
    FileTransfer = 101,
    Realise = 102,
    CopyPaths = 103,
    Builds = 104,
    Build = 105,
    OptimiseStore = 106,
    VerifyPaths = 107,
    Substitute = 108,
    QueryPathInfo = 109,
    PostBuildHook = 110,
    BuildWaiting = 111,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 13] = [
        ActivityKind::Unknown,
        ActivityKind::CopyPath,
        ActivityKind::FileTransfer,
        ActivityKind::Realise,
        ActivityKind::CopyPaths,
        ActivityKind::Builds,
        ActivityKind::Build,
        ActivityKind::OptimiseStore,
        ActivityKind::VerifyPaths,
        ActivityKind::Substitute,
        ActivityKind::QueryPathInfo,
        ActivityKind::PostBuildHook,
        ActivityKind::BuildWaiting,
    ];

    /// 从原始值解码，未知值映射为 `Unknown`
    /// Decode from a raw value; unknown values map to `Unknown`
    pub fn from_raw(raw: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| *kind as u32 == raw)
            .unwrap_or(ActivityKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Unknown => "unknown",
            ActivityKind::CopyPath => "copy-path",
            ActivityKind::FileTransfer => "file-transfer",
            ActivityKind::Realise => "realise",
            ActivityKind::CopyPaths => "copy-paths",
            ActivityKind::Builds => "builds",
            ActivityKind::Build => "build",
            ActivityKind::OptimiseStore => "optimise-store",
            ActivityKind::VerifyPaths => "verify-paths",
            ActivityKind::Substitute => "substitute",
            ActivityKind::QueryPathInfo => "query-path-info",
            ActivityKind::PostBuildHook => "post-build-hook",
            ActivityKind::BuildWaiting => "build-waiting",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结果类型
/// Result kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ResultKind {
    #[default]
    Unknown = 0,
    FileLinked = 100,
    BuildLogLine = 101,
    UntrustedPath = 102,
    CorruptedPath = 103,
    SetPhase = 104,
    Progress = 105,
    SetExpected = 106,
    PostBuildLogLine = 107,
}

impl ResultKind {
    pub const ALL: [ResultKind; 9] = [
        ResultKind::Unknown,
        ResultKind::FileLinked,
        ResultKind::BuildLogLine,
        ResultKind::UntrustedPath,
        ResultKind::CorruptedPath,
        ResultKind::SetPhase,
        ResultKind::Progress,
        ResultKind::SetExpected,
        ResultKind::PostBuildLogLine,
    ];

    /// 从原始值解码，未知值映射为 `Unknown`
    /// Decode from a raw value; unknown values map to `Unknown`
    pub fn from_raw(raw: u32) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| *kind as u32 == raw)
            .unwrap_or(ResultKind::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultKind::Unknown => "unknown",
            ResultKind::FileLinked => "file-linked",
            ResultKind::BuildLogLine => "build-log-line",
            ResultKind::UntrustedPath => "untrusted-path",
            ResultKind::CorruptedPath => "corrupted-path",
            ResultKind::SetPhase => "set-phase",
            ResultKind::Progress => "progress",
            ResultKind::SetExpected => "set-expected",
            ResultKind::PostBuildLogLine => "post-build-log-line",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
