//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, apply APP__SECTION__KEY overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → published once into the bootstrap context
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Loading never exits the process; errors go back to the caller

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AppConfig;
pub use schema::CacheConfig;
pub use schema::DatabaseConfig;
pub use schema::ObservabilityConfig;
pub use schema::ServerConfig;
