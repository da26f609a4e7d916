//! Typed errors for installing the bridge.

use buildtrace_engine::EngineError;
use thiserror::Error;

/// Errors that can occur while configuring or installing the bridge.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BridgeError {
    /// Configuration could not be loaded or deserialized.
    #[error("Bridge configuration error: {0}")]
    Config(String),

    /// A bridge instance is already installed in this process.
    #[error("Bridge already installed")]
    AlreadyInstalled,

    /// The telemetry engine failed.
    #[error("Telemetry engine error: {0}")]
    Engine(#[from] EngineError),
}

impl From<config::ConfigError> for BridgeError {
    fn from(err: config::ConfigError) -> Self {
        BridgeError::Config(err.to_string())
    }
}

/// Bridge result type using the typed [`BridgeError`].
pub type BridgeResult<T> = Result<T, BridgeError>;
