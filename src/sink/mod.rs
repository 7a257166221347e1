//! Record sinks.
//!
//! # Data Flow
//! ```text
//! Collector::gather
//!     → Accumulator::add_record (one call per MetricRecord)
//!     → Accumulator::add_error  (one call per failed endpoint)
//!     → Accumulator::end_cycle  (once, after the cycle is handed over)
//!
//! Implementations:
//!     → memory.rs      (keeps everything; tests and the CLI)
//!     → json_lines.rs  (one JSON object per line)
//!     → prometheus.rs  (gauges on the metrics endpoint)
//! ```

pub mod json_lines;
pub mod memory;
pub mod prometheus;

use crate::collector::error::CollectError;
use crate::mapping::MetricRecord;

/// Destination for collected records and per-endpoint errors.
pub trait Accumulator: Send + Sync {
    fn add_record(&self, record: MetricRecord);

    fn add_error(&self, error: CollectError);

    /// Called once per cycle after every record and error was added, also
    /// when the cycle produced nothing.
    fn end_cycle(&self) {}
}

pub use json_lines::JsonLinesSink;
pub use memory::MemoryAccumulator;
pub use prometheus::PrometheusSink;
