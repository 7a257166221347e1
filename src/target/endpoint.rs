//! Endpoint resolution.
//!
//! # Responsibilities
//! - Parse a configured URL string
//! - Derive the `server`/`port` tags that identify the source of a record

use std::collections::BTreeMap;

use url::{Host, Url};

use crate::collector::error::{CollectError, CollectResult};

/// Tag set attached to a metric record.
pub type Tags = BTreeMap<String, String>;

/// A parsed status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// The URL as requested.
    pub url: Url,
    /// Host part, IPv6 addresses without brackets.
    pub host: String,
    /// Explicit port, or the scheme default (empty for unknown schemes).
    pub port: String,
}

impl Endpoint {
    /// Parse a configured endpoint string.
    pub fn parse(raw: &str) -> CollectResult<Self> {
        let url = Url::parse(raw).map_err(|source| CollectError::UrlParse {
            url: raw.to_string(),
            source,
        })?;

        let host = match url.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => String::new(),
        };

        // `Url::port` hides ports equal to the scheme default, which maps to
        // the same tag value below.
        let port = match url.port() {
            Some(port) => port.to_string(),
            None => default_port(url.scheme()).to_string(),
        };

        Ok(Self { url, host, port })
    }

    /// Base tags for records produced from this endpoint.
    pub fn tags(&self) -> Tags {
        let mut tags = Tags::new();
        tags.insert("server".to_string(), self.host.clone());
        tags.insert("port".to_string(), self.port.clone());
        tags
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

fn default_port(scheme: &str) -> &'static str {
    match scheme {
        "http" => "80",
        "https" => "443",
        _ => "",
    }
}
