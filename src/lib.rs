//! Collector for nginx `upstream_check_module` status pages.

pub mod collector;
pub mod config;
pub mod fetch;
pub mod lifecycle;
pub mod mapping;
pub mod observability;
pub mod sink;
pub mod status;
pub mod target;

pub use collector::{CollectError, Collection, Collector, Poller};
pub use config::CollectorConfig;
pub use lifecycle::Shutdown;
pub use mapping::{FieldValue, MetricRecord};
pub use sink::Accumulator;
