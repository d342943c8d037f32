//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → /healthz, /readyz handlers (read the Manager and context)
//!     → Send to client
//! ```
//!
//! User-facing routes are mounted by their own modules; this layer only
//! carries the operational surface.

pub mod server;

pub use server::{AppState, HttpServer};
