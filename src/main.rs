//! Account service.
//!
//! # Bootstrap
//!
//! ```text
//!   main
//!    │
//!    ├─ exec("config")         load + validate TOML, APP__* overrides
//!    ├─ exec("logging")        tracing subscriber
//!    ├─ exec("metrics")        Prometheus exporter, when enabled
//!    ├─ register("database")   Postgres pool
//!    ├─ register("cache")      Redis connection
//!    │
//!    └─ Manager::run ──▶ initialize pending steps ──▶ serve HTTP
//!                         (first failure: no listener, exit 1)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use account_service::context::AppContext;
use account_service::http::HttpServer;
use account_service::lifecycle::startup::{self, StartupOptions};
use account_service::lifecycle::{signals, Manager, Shutdown};

#[derive(Parser)]
#[command(name = "account-service", version, about = "Account service backend", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config/account-service.toml")]
    config: PathBuf,

    /// Use `database.test_url` instead of `database.url`.
    #[arg(long)]
    test_mode: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Built outside any async context: bootstrap steps drive async
    // connectors with `Handle::block_on`.
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("account-service: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let manager = Arc::new(Manager::new());
    let context = Arc::new(AppContext::new());
    let options = StartupOptions {
        config_path: args.config,
        test_mode: args.test_mode,
    };

    // Logging may not be installed yet, so report on stderr.
    if let Err(e) = startup::bootstrap(&manager, &context, runtime.handle(), &options) {
        eprintln!("account-service: bootstrap failed: {e}");
        return ExitCode::FAILURE;
    }

    let served = manager.run(|| runtime.block_on(serve(Arc::clone(&manager), Arc::clone(&context))));

    match served {
        Ok(Ok(())) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "HTTP server failed");
            ExitCode::FAILURE
        }
        // Already logged by `Manager::run`.
        Err(_) => ExitCode::FAILURE,
    }
}

async fn serve(manager: Arc<Manager>, context: Arc<AppContext>) -> Result<(), Box<dyn std::error::Error>> {
    let config = context.config()?.server.clone();

    let listener = TcpListener::bind(&config.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&config, manager, context);
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown(&signal_shutdown).await;
    });

    server.run(listener, server_shutdown).await?;
    Ok(())
}
