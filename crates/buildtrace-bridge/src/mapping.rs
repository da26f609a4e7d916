//! Host type to engine kind translation.
//!
//! The host's enumerations and the engine's are versioned independently. Every
//! host value the engine knows maps one-to-one; everything else, including
//! values added to the host after this table was written, maps to `Unknown`.

use buildtrace_engine as engine;
use buildtrace_kernel::{ActivityId, ActivityType, ResultType};
use engine::{ActivityKind, ResultKind};

pub fn map_activity_type(ty: ActivityType) -> ActivityKind {
    match ty {
        ActivityType::CopyPath => ActivityKind::CopyPath,
        ActivityType::FileTransfer => ActivityKind::FileTransfer,
        ActivityType::Realise => ActivityKind::Realise,
        ActivityType::CopyPaths => ActivityKind::CopyPaths,
        ActivityType::Builds => ActivityKind::Builds,
        ActivityType::Build => ActivityKind::Build,
        ActivityType::OptimiseStore => ActivityKind::OptimiseStore,
        ActivityType::VerifyPaths => ActivityKind::VerifyPaths,
        ActivityType::Substitute => ActivityKind::Substitute,
        ActivityType::QueryPathInfo => ActivityKind::QueryPathInfo,
        ActivityType::PostBuildHook => ActivityKind::PostBuildHook,
        ActivityType::BuildWaiting => ActivityKind::BuildWaiting,
        _ => ActivityKind::Unknown,
    }
}

pub fn map_result_type(ty: ResultType) -> ResultKind {
    match ty {
        ResultType::FileLinked => ResultKind::FileLinked,
        ResultType::BuildLogLine => ResultKind::BuildLogLine,
        ResultType::UntrustedPath => ResultKind::UntrustedPath,
        ResultType::CorruptedPath => ResultKind::CorruptedPath,
        ResultType::SetPhase => ResultKind::SetPhase,
        ResultType::Progress => ResultKind::Progress,
        ResultType::SetExpected => ResultKind::SetExpected,
        ResultType::PostBuildLogLine => ResultKind::PostBuildLogLine,
        _ => ResultKind::Unknown,
    }
}

pub fn map_activity_id(id: ActivityId) -> engine::ActivityId {
    engine::ActivityId(id.0)
}
