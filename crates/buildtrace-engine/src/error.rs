//! Typed errors for the telemetry engine.

use thiserror::Error;

/// Errors that can occur while starting or running the engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The exporter thread could not be spawned.
    #[error("Failed to spawn exporter thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),

    /// The exporter's async runtime could not be built.
    #[error("Failed to build exporter runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The OTLP span exporter could not be built.
    #[error("Failed to build span exporter: {0}")]
    Exporter(String),

    /// The exporter thread exited before reporting that it was ready.
    #[error("Exporter thread exited during startup")]
    StartupAborted,
}

/// Engine result type using the typed [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
