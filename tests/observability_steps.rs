//! Logging and metrics are separate bootstrap steps, so a metrics listener
//! that cannot bind is retried without touching the installed subscriber.
//!
//! Own test binary: both steps install process-global state.

use std::net::TcpListener;
use std::sync::Arc;

use account_service::lifecycle::startup::{
    bootstrap, StartupOptions, CONFIG_STEP, DATABASE_STEP, LOGGING_STEP, METRICS_STEP,
};
use account_service::{AppContext, Manager};

mod common;

#[test]
fn test_metrics_bind_failure_is_retryable() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();

    // Hold the port so the exporter cannot bind it.
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = occupied.local_addr().unwrap();

    let config = common::write_config(
        "observability-steps",
        &format!(
            "[observability]\nmetrics_enabled = true\nmetrics_address = \"{address}\"\n"
        ),
    );

    let manager = Manager::new();
    let context = Arc::new(AppContext::new());
    let options = StartupOptions {
        config_path: config.path().to_path_buf(),
        test_mode: false,
    };

    let err = bootstrap(&manager, &context, runtime.handle(), &options).unwrap_err();
    assert_eq!(err.step(), METRICS_STEP);
    assert!(manager.is_initialized(CONFIG_STEP));
    assert!(manager.is_initialized(LOGGING_STEP));
    assert!(!manager.is_initialized(METRICS_STEP));
    // Connectors are never registered after a failed exec.
    assert!(manager.status().iter().all(|s| s.name != DATABASE_STEP));

    // The retry fails on the listener again, not on the subscriber.
    let retry = manager.initialize().unwrap_err();
    assert_eq!(retry.step(), METRICS_STEP);
    assert!(!retry.to_string().contains("global default"));
    assert!(manager.is_initialized(LOGGING_STEP));

    drop(occupied);
}
