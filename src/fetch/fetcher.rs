//! Status page fetching.
//!
//! # Responsibilities
//! - Build the HTTP client shared by every endpoint of a collector
//! - Issue one GET per endpoint, bounded by the response timeout
//! - Reject non-200 answers and non-JSON content before decoding

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};

use crate::collector::error::{CollectError, CollectResult};
use crate::target::Endpoint;

/// Timeout used when the configured one is unset or below one second.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

const MIN_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

const JSON_CONTENT_TYPE: &str = "application/json";

/// Apply the response timeout floor.
pub fn effective_timeout(configured: Duration) -> Duration {
    if configured < MIN_RESPONSE_TIMEOUT {
        DEFAULT_RESPONSE_TIMEOUT
    } else {
        configured
    }
}

/// Build a client whose requests are bounded by `timeout`.
///
/// Environment proxies are ignored: status pages are polled directly.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(effective_timeout(timeout))
        .no_proxy()
        .user_agent(concat!("upstream-check/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetch the status document body of one endpoint.
pub async fn fetch_status(client: &Client, endpoint: &Endpoint) -> CollectResult<Vec<u8>> {
    let url = endpoint.as_str();

    let response = client
        .get(endpoint.url.clone())
        .send()
        .await
        .map_err(|source| CollectError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(CollectError::BadStatus {
            url: url.to_string(),
            status: status.to_string(),
        });
    }

    let content_type = media_type(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or(""),
    );
    if !content_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        return Err(CollectError::UnsupportedContentType {
            url: url.to_string(),
            content_type: content_type.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| CollectError::Request {
            url: url.to_string(),
            source,
        })?;

    tracing::debug!(url = %url, bytes = body.len(), "Fetched status page");
    Ok(body.to_vec())
}

/// Content-Type without parameters.
fn media_type(header: &str) -> &str {
    header.split(';').next().unwrap_or("").trim()
}
