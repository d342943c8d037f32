//! End-to-end bootstrap sequencing through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use account_service::config::load_config;
use account_service::lifecycle::{InitError, Manager};
use account_service::AppContext;

mod common;

#[test]
fn test_config_db_cache_sequence_stops_at_cache() {
    let manager = Manager::new();
    let context = Arc::new(AppContext::new());
    let order = Arc::new(Mutex::new(Vec::new()));

    let config = common::write_config(
        "bootstrap-sequence",
        "[server]\nbind_address = \"127.0.0.1:8088\"\n",
    );
    let path = config.path().to_path_buf();

    let ctx = Arc::clone(&context);
    let o = Arc::clone(&order);
    manager
        .exec("config", move || {
            o.lock().unwrap().push("config");
            ctx.set_config(load_config(&path)?)?;
            Ok(())
        })
        .unwrap();

    let ctx = Arc::clone(&context);
    let o = Arc::clone(&order);
    manager
        .register("db", move || {
            o.lock().unwrap().push("db");
            // Reads what the previous step published.
            let bind = &ctx.config()?.server.bind_address;
            assert_eq!(bind, "127.0.0.1:8088");
            Ok(())
        })
        .unwrap();

    let o = Arc::clone(&order);
    manager
        .register("cache", move || {
            o.lock().unwrap().push("cache");
            Err("connection refused".into())
        })
        .unwrap();

    let sms_calls = Arc::new(AtomicUsize::new(0));
    let s = Arc::clone(&sms_calls);
    manager
        .register("sms", move || {
            s.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

    let served = AtomicUsize::new(0);
    let err = manager
        .run(|| served.fetch_add(1, Ordering::SeqCst))
        .unwrap_err();

    match &err {
        InitError::Step { step, source } => {
            assert_eq!(step, "cache");
            assert_eq!(source.to_string(), "connection refused");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(*order.lock().unwrap(), vec!["config", "db", "cache"]);
    assert_eq!(sms_calls.load(Ordering::SeqCst), 0);
    assert_eq!(served.load(Ordering::SeqCst), 0);

    assert!(manager.is_initialized("config"));
    assert!(manager.is_initialized("db"));
    assert!(!manager.is_initialized("cache"));
    assert!(!manager.is_initialized("sms"));
    assert!(!manager.is_ready());
}

#[test]
fn test_run_serves_after_successful_bootstrap() {
    let manager = Manager::new();
    let calls = Arc::new(AtomicUsize::new(0));

    for name in ["config", "db", "cache"] {
        let c = Arc::clone(&calls);
        manager
            .register(name, move || {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
    }

    assert_eq!(manager.run(|| "serving").unwrap(), "serving");
    assert_eq!(manager.run(|| "again").unwrap(), "again");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(manager.is_ready());
}

#[test]
fn test_invalid_config_fails_config_step() {
    let manager = Manager::new();
    let context = Arc::new(AppContext::new());
    let config = common::write_config("bootstrap-invalid", "[cache]\nurl = \"http://nope\"\n");
    let path = config.path().to_path_buf();

    let ctx = Arc::clone(&context);
    let err = manager
        .exec("config", move || {
            ctx.set_config(load_config(&path)?)?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err.step(), "config");
    assert!(err.to_string().contains("cache.url"));
    assert!(context.config().is_err());
}
