//! Target resolution.
//!
//! # Data Flow
//! ```text
//! configured URL string
//!     → endpoint.rs (parse, derive host/port)
//!     → Endpoint { url, host, port }
//!     → tags() = {server, port} on every aggregate record
//! ```

pub mod endpoint;

pub use endpoint::{Endpoint, Tags};
