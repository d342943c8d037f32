//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs → manager.rs):
//!     exec(config) → exec(logging) → exec(metrics) → register(database, cache)
//!     → Manager::run: initialize pending steps → start listeners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then connectors, then listeners
//! - Every step runs at most once after it succeeded
//! - The Manager reports failures; only `main` decides to exit

pub mod error;
pub mod manager;
pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod step;

pub use error::{BoxError, DuplicateNameError, InitError, StepResult};
pub use manager::Manager;
pub use shutdown::Shutdown;
pub use step::{InitStep, StepStatus};
