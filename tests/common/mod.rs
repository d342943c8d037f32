//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use account_service::config::ServerConfig;
use account_service::{AppContext, HttpServer, Manager, Shutdown};
use tokio::net::TcpListener;

/// A TOML file in the temp dir, removed on drop.
#[allow(dead_code)]
pub struct TempConfig {
    path: PathBuf,
}

#[allow(dead_code)]
impl TempConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Write `content` to a uniquely named TOML file in the temp dir.
#[allow(dead_code)]
pub fn write_config(name: &str, content: &str) -> TempConfig {
    let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    TempConfig { path }
}

/// Start the operational HTTP server on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(
    manager: Arc<Manager>,
    context: Arc<AppContext>,
) -> (SocketAddr, Shutdown, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(&ServerConfig::default(), manager, context);
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown, handle)
}
