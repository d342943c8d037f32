//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the operational endpoints
//! - Wire up middleware (tracing, request timeout)
//! - Serve on a listener until the shutdown broadcast fires
//!
//! # Endpoints
//! - `GET /healthz`: liveness, always 200 while the process serves
//! - `GET /readyz`: 200 with the step snapshot once bootstrapped, 503 before

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::context::AppContext;
use crate::lifecycle::{Manager, StepStatus};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<Manager>,
    pub context: Arc<AppContext>,
}

#[derive(Debug, Serialize)]
pub struct Liveness {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub steps: Vec<StepStatus>,
    pub components: Vec<&'static str>,
}

/// HTTP server for the operational endpoints.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ServerConfig, manager: Arc<Manager>, context: Arc<AppContext>) -> Self {
        let state = AppState { manager, context };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(liveness))
            .route("/readyz", get(readiness))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn liveness() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let body = Readiness {
        ready: state.manager.is_ready(),
        steps: state.manager.status(),
        components: state.context.components(),
    };
    let status = if body.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}
