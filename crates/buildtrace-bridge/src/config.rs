//! Bridge configuration
//!
//! Settings are layered: built-in defaults, then an optional file (TOML or
//! JSON, detected from the extension), then `BUILDTRACE_*` environment
//! variables. When no endpoint is configured anywhere, the standard
//! `OTEL_EXPORTER_OTLP_ENDPOINT` variable is consulted.
//!
//! # Example
//!
//! ```rust,ignore
//! use buildtrace_bridge::BridgeConfig;
//!
//! // BUILDTRACE_OTLP_ENDPOINT=http://collector:4317
//! let config = BridgeConfig::load(None)?;
//! ```

use crate::error::BridgeResult;
use buildtrace_engine::EngineConfig;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Prefix of the bridge's own environment variables.
pub const ENV_PREFIX: &str = "BUILDTRACE";

/// Standard OpenTelemetry endpoint variable, used as a fallback.
pub const OTEL_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// OTLP endpoint; empty or absent disables telemetry.
    pub otlp_endpoint: Option<String>,
    /// Headers for OTLP exports, `k=v,k2=v2`.
    pub otlp_headers: Option<String>,
    pub service_name: String,
    /// `tracing` filter for the bridge's own diagnostics.
    pub log_filter: Option<String>,
    /// Emit the bridge's diagnostics as JSON lines.
    pub log_json: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            otlp_headers: None,
            service_name: "buildtrace".to_string(),
            log_filter: None,
            log_json: false,
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_headers(mut self, headers: impl Into<String>) -> Self {
        self.otlp_headers = Some(headers.into());
        self
    }

    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Load from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> BridgeResult<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_with_env(path, env)
    }

    /// Load from an optional file and an explicit set of environment variables.
    pub fn load_with_env(path: Option<&Path>, env: HashMap<String, String>) -> BridgeResult<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: BridgeConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(false)
                    .source(Some(env.clone().into_iter().collect())),
            )
            .build()?
            .try_deserialize()?;

        Ok(config.with_endpoint_fallback(|key| env.get(key).cloned()))
    }

    fn with_endpoint_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if self.otlp_endpoint.is_none() {
            self.otlp_endpoint = lookup(OTEL_ENDPOINT_ENV);
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.otlp_endpoint
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty())
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::new().with_service_name(self.service_name.clone());
        if let Some(endpoint) = self.otlp_endpoint.as_deref().filter(|e| !e.trim().is_empty()) {
            config = config.with_endpoint(endpoint);
        }
        if let Some(headers) = &self.otlp_headers {
            config = config.with_headers(headers.clone());
        }
        config
    }
}
