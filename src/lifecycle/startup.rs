//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration (immediately, via `exec`)
//! - Install logging and metrics from that configuration
//! - Register the database and cache connectors in dependency order
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last, from `Manager::run` (traffic only when ready)
//! - Async connectors are driven with `Handle::block_on`; must be called
//!   from outside the runtime

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::cache::Cache;
use crate::config::load_config;
use crate::context::AppContext;
use crate::database::Database;
use crate::lifecycle::error::InitError;
use crate::lifecycle::manager::Manager;
use crate::observability::{logging, metrics};

pub const CONFIG_STEP: &str = "config";
pub const LOGGING_STEP: &str = "logging";
pub const METRICS_STEP: &str = "metrics";
pub const DATABASE_STEP: &str = "database";
pub const CACHE_STEP: &str = "cache";

/// Command-line level startup options.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    /// Path to the TOML configuration file.
    pub config_path: PathBuf,
    /// Connect to the test database instead of the production one.
    pub test_mode: bool,
}

/// Wire the standard bootstrap sequence into `manager`.
///
/// Configuration, logging and metrics run right away, so a bad config file
/// stops the process before anything else is attempted. Logging and metrics
/// are separate steps: each installs process-global state, and a failed
/// metrics listener must be retryable without reinstalling the subscriber. Database and cache
/// are only registered; they run on the first `initialize` or `run`.
pub fn bootstrap(
    manager: &Manager,
    context: &Arc<AppContext>,
    handle: &Handle,
    options: &StartupOptions,
) -> Result<(), InitError> {
    let ctx = Arc::clone(context);
    let path = options.config_path.clone();
    manager.exec(CONFIG_STEP, move || {
        let config = load_config(&path)?;
        ctx.set_config(config)?;
        Ok(())
    })?;

    let ctx = Arc::clone(context);
    manager.exec(LOGGING_STEP, move || {
        logging::init(&ctx.config()?.observability)?;
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "account-service starting");
        Ok(())
    })?;

    let ctx = Arc::clone(context);
    let runtime = handle.clone();
    manager.exec(METRICS_STEP, move || {
        let config = &ctx.config()?.observability;
        if !config.metrics_enabled {
            return Ok(());
        }
        // The exporter spawns its listener on the ambient runtime.
        let _guard = runtime.enter();
        metrics::init_metrics(config.metrics_address.parse()?)?;
        tracing::info!(address = %config.metrics_address, "Metrics exporter listening");
        Ok(())
    })?;

    register_connectors(manager, context, handle, options.test_mode)?;
    Ok(())
}

/// Register the database and cache steps without running them.
pub fn register_connectors(
    manager: &Manager,
    context: &Arc<AppContext>,
    handle: &Handle,
    test_mode: bool,
) -> Result<(), InitError> {
    let ctx = Arc::clone(context);
    let runtime = handle.clone();
    manager.register(DATABASE_STEP, move || {
        let database = runtime.block_on(Database::connect(&ctx.config()?.database, test_mode))?;
        ctx.set_database(database)?;
        Ok(())
    })?;

    let ctx = Arc::clone(context);
    let runtime = handle.clone();
    manager.register(CACHE_STEP, move || {
        let cache = runtime.block_on(Cache::connect(&ctx.config()?.cache))?;
        ctx.set_cache(cache)?;
        Ok(())
    })?;

    Ok(())
}
