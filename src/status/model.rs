//! Status page document model.
//!
//! Mirrors the JSON emitted by `upstream_check_module` with `format=json`.
//! Unknown fields are ignored so newer module versions still decode.

use serde::Deserialize;

/// Root of the status document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusDocument {
    pub servers: UpstreamStatus,
}

/// Aggregate totals plus the per-peer list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpstreamStatus {
    /// Number of checked servers.
    pub total: i64,
    /// Module generation; absent on builds that do not report it.
    #[serde(default)]
    pub generation: Option<i64>,
    #[serde(default, rename = "server")]
    pub peers: Vec<PeerStatus>,
}

/// One health-checked backend server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct PeerStatus {
    /// Position in the configured peer list.
    pub index: Option<i64>,
    /// Owning upstream group.
    pub upstream: String,
    /// Server address, usually `ip:port`.
    pub name: String,
    /// Reported state, passed through unchanged ("up", "down", ...).
    pub status: String,
    /// Consecutive successful checks.
    pub rise: i64,
    /// Consecutive failed checks.
    pub fall: i64,
    /// Check type ("http", "tcp", ...).
    #[serde(rename = "type")]
    pub check_type: String,
    /// Port used for the check, 0 when it is the server's own port.
    pub port: i64,
}
