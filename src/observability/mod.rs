//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Bootstrap (lifecycle::manager):
//!     → logging.rs (structured step events)
//!     → metrics.rs (step counters, durations, ready gauge)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
