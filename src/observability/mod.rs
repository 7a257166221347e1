//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, one span per collection cycle)
//!     → metrics.rs (cycle duration, endpoint count, error counters)
//!
//! Consumers:
//!     → stderr
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
