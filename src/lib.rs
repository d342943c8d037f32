//! Account service bootstrap library.

pub mod cache;
pub mod config;
pub mod context;
pub mod database;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use context::AppContext;
pub use http::HttpServer;
pub use lifecycle::{InitError, Manager, Shutdown};
