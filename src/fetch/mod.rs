//! HTTP fetching of status pages.
//!
//! # Design Decisions
//! - One client per collector, reused across cycles (connection pool)
//! - Timeout is per request; there is no retry
//! - The response is dropped on every return path, releasing the connection

pub mod fetcher;

pub use fetcher::{build_client, effective_timeout, fetch_status, DEFAULT_RESPONSE_TIMEOUT};
