//! Metric mapping.
//!
//! # Data Flow
//! ```text
//! UpstreamStatus + endpoint tags
//!     → mapper.rs (pure, no I/O)
//!     → Vec<MetricRecord> (record.rs)
//!     → sink
//! ```

pub mod mapper;
pub mod record;

pub use mapper::{map_status, PEER_MEASUREMENT, UPSTREAM_MEASUREMENT};
pub use record::{FieldValue, Fields, MetricRecord};
