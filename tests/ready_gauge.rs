//! The `bootstrap_ready` gauge follows the Manager's ready flag.
//!
//! Lives in its own test binary with a single test: the metrics recorder is
//! process-global.

use account_service::Manager;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

fn ready_gauge(handle: &PrometheusHandle) -> Option<f64> {
    handle
        .render()
        .lines()
        .find_map(|line| line.strip_prefix("bootstrap_ready "))
        .and_then(|value| value.trim().parse().ok())
}

#[test]
fn test_ready_gauge_tracks_manager() {
    let handle = PrometheusBuilder::new().install_recorder().unwrap();
    let manager = Manager::new();

    manager.register("config", || Ok(())).unwrap();
    assert_eq!(ready_gauge(&handle), Some(0.0));

    manager.initialize().unwrap();
    assert!(manager.is_ready());
    assert_eq!(ready_gauge(&handle), Some(1.0));

    // A new pending step takes the process out of ready.
    manager.register("late", || Err("smtp relay down".into())).unwrap();
    assert!(!manager.is_ready());
    assert_eq!(ready_gauge(&handle), Some(0.0));

    assert!(manager.initialize().is_err());
    assert!(!manager.is_ready());
    assert_eq!(ready_gauge(&handle), Some(0.0));

    // Failing `run` keeps it down too.
    assert!(manager.run(|| ()).is_err());
    assert_eq!(ready_gauge(&handle), Some(0.0));

    let rendered = handle.render();
    assert!(rendered.contains("bootstrap_steps_total"));
    assert!(rendered.contains("outcome=\"failure\""));
}

