//! Collection subsystem.
//!
//! # Data Flow
//! ```text
//! poller.rs (interval tick)
//!     → orchestrator.rs Collector::gather
//!         → one task per URL:
//!             target::Endpoint::parse
//!             → fetch::fetch_status
//!             → status::decode_status
//!             → mapping::map_status
//!         → join all tasks
//!     → sink::Accumulator (records, then errors)
//! ```
//!
//! # Design Decisions
//! - Errors are per endpoint (error.rs) and accumulated, never short-circuit
//! - The HTTP client lives on the Collector; a config reload builds a new one

pub mod error;
pub mod orchestrator;
pub mod poller;

pub use error::{CollectError, CollectResult};
pub use orchestrator::{collect_endpoint, Collection, Collector};
pub use poller::Poller;
