//! Operational HTTP endpoints against a real listener.

use std::sync::Arc;
use std::time::Duration;

use account_service::config::AppConfig;
use account_service::{AppContext, Manager};
use serde_json::Value;

mod common;

#[tokio::test]
async fn test_readyz_tracks_bootstrap() {
    let manager = Arc::new(Manager::new());
    let context = Arc::new(AppContext::new());

    let ctx = Arc::clone(&context);
    manager
        .register("config", move || {
            ctx.set_config(AppConfig::default())?;
            Ok(())
        })
        .unwrap();

    let (addr, shutdown, handle) =
        common::start_server(Arc::clone(&manager), Arc::clone(&context)).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("http://{}/readyz", addr)).send().await.unwrap();
    assert_eq!(res.status(), 503);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ready"], false);
    assert_eq!(body["steps"][0]["name"], "config");
    assert_eq!(body["steps"][0]["completed"], false);

    let m = Arc::clone(&manager);
    tokio::task::spawn_blocking(move || m.initialize())
        .await
        .unwrap()
        .unwrap();

    let res = client.get(format!("http://{}/readyz", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ready"], true);
    assert_eq!(body["steps"][0]["completed"], true);
    assert_eq!(body["components"], serde_json::json!(["config"]));

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_healthz_is_always_ok() {
    let manager = Arc::new(Manager::new());
    let context = Arc::new(AppContext::new());
    let (addr, shutdown, _handle) = common::start_server(manager, context).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let res = client.get(format!("http://{}/healthz", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    shutdown.trigger();
}
