//! Installation and teardown of the logger decorator.
//!
//! 安装时捕获当前日志器并替换为 [`OtelLogger`]；卸载时按固定顺序还原。
//! Installing captures the active logger and replaces it with an
//! [`OtelLogger`]. Teardown always runs in this order:
//!
//! 1. the captured logger becomes the active logger again
//! 2. the engine is shut down
//! 3. the decorator is released
//!
//! so no host call can reach the engine after it has been shut down.

use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::logger::OtelLogger;
use crate::logging::init_logging;
use buildtrace_engine::{Context, TelemetryEngine};
use buildtrace_kernel::{self as kernel, Logger};
use parking_lot::Mutex;
use std::panic::catch_unwind;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

static INSTALLED: AtomicBool = AtomicBool::new(false);

static GLOBAL_INSTANCE: Mutex<Option<BridgeInstance>> = Mutex::new(None);

/// The install flag, held while an install is in progress.
///
/// Released on drop, including unwinding, unless the install completed.
struct Claim {
    committed: bool,
}

impl Claim {
    fn acquire() -> BridgeResult<Self> {
        INSTALLED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BridgeError::AlreadyInstalled)?;
        Ok(Self { committed: false })
    }

    /// Keep the flag set; `BridgeInstance::release` clears it.
    fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        if !self.committed {
            INSTALLED.store(false, Ordering::Release);
        }
    }
}

/// An installed bridge. Dropping it tears the bridge down.
pub struct BridgeInstance {
    previous: Arc<dyn Logger>,
    logger: Option<Arc<OtelLogger>>,
    engine: Option<Arc<dyn TelemetryEngine>>,
}

impl BridgeInstance {
    /// Create the engine from `config` and install the decorator.
    ///
    /// An engine that fails to start is replaced by a disabled one; the host
    /// keeps working and only telemetry is lost.
    pub fn install(config: &BridgeConfig) -> BridgeResult<Self> {
        init_logging(config.log_filter.as_deref(), config.log_json);
        let claim = Claim::acquire()?;

        let context = match catch_unwind(|| Context::initialize(config.to_engine_config())) {
            Ok(Ok(context)) => context,
            Ok(Err(e)) => {
                warn!("telemetry engine failed to start: {e}; continuing without telemetry");
                Context::disabled()
            }
            Err(_) => {
                warn!("telemetry engine panicked while starting; continuing without telemetry");
                Context::disabled()
            }
        };
        Ok(Self::activate(claim, Arc::new(context)))
    }

    /// Install the decorator in front of an already created engine.
    pub fn install_with_engine(engine: Arc<dyn TelemetryEngine>) -> BridgeResult<Self> {
        let claim = Claim::acquire()?;
        Ok(Self::activate(claim, engine))
    }

    fn activate(claim: Claim, engine: Arc<dyn TelemetryEngine>) -> Self {
        let previous = kernel::logger();
        let logger = Arc::new(OtelLogger::new(previous.clone(), engine.clone()));
        kernel::set_logger(logger.clone());
        claim.commit();
        info!("activity telemetry installed");

        Self {
            previous,
            logger: Some(logger),
            engine: Some(engine),
        }
    }

    /// The logger that was active at install time.
    pub fn previous(&self) -> &Arc<dyn Logger> {
        &self.previous
    }

    pub fn is_installed(&self) -> bool {
        self.logger.is_some()
    }

    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(logger) = self.logger.take() else {
            return;
        };

        let replaced = kernel::set_logger(self.previous.clone());
        let ours: Arc<dyn Logger> = logger.clone();
        if !Arc::ptr_eq(&replaced, &ours) {
            warn!("active logger changed after install; restoring the pre-install logger");
        }
        drop((replaced, ours));

        if let Some(engine) = self.engine.take() {
            engine.shutdown();
        }

        drop(logger);
        INSTALLED.store(false, Ordering::Release);
        debug!("activity telemetry removed");
    }
}

impl Drop for BridgeInstance {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for BridgeInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeInstance")
            .field("installed", &self.is_installed())
            .finish()
    }
}

/// Install a process-wide bridge, for hosts that load the bridge as a plugin
/// and cannot hold on to a [`BridgeInstance`].
pub fn install_global(config: &BridgeConfig) -> BridgeResult<()> {
    let mut slot = GLOBAL_INSTANCE.lock();
    if slot.is_some() {
        return Err(BridgeError::AlreadyInstalled);
    }
    *slot = Some(BridgeInstance::install(config)?);
    Ok(())
}

/// Tear down the process-wide bridge, if any.
pub fn teardown_global() {
    let instance = GLOBAL_INSTANCE.lock().take();
    if let Some(instance) = instance {
        instance.teardown();
    }
}
