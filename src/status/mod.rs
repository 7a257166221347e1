//! Status document decoding.
//!
//! # Data Flow
//! ```text
//! response body bytes
//!     → decoder.rs (serde_json, best-effort field decoding)
//!     → model.rs UpstreamStatus { total, generation?, peers }
//! ```
//!
//! # Design Decisions
//! - `servers` and `servers.total` are required; everything else defaults
//! - `generation` and peer `index` are `Option` all the way to the mapper

pub mod decoder;
pub mod model;

pub use decoder::decode_status;
pub use model::{PeerStatus, StatusDocument, UpstreamStatus};
