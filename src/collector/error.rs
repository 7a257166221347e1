//! Collection error definitions.

use thiserror::Error;

/// Errors produced while collecting from status endpoints.
///
/// Every variant except `Client` is scoped to a single endpoint and never
/// stops the rest of the batch.
#[derive(Debug, Error)]
pub enum CollectError {
    /// The configured URL could not be parsed.
    #[error("unable to parse address '{url}': {source}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection, timeout or body transfer failure.
    #[error("error making HTTP request to {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with something other than 200.
    #[error("{url} returned HTTP status {status}")]
    BadStatus { url: String, status: String },

    /// The endpoint did not answer with JSON.
    #[error("{url} returned unexpected content type {content_type}")]
    UnsupportedContentType { url: String, content_type: String },

    /// The body was not a well-formed status document.
    #[error("error while decoding JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The endpoint's collection task panicked.
    #[error("collection task for {url} failed: {message}")]
    Task { url: String, message: String },

    /// The shared HTTP client could not be built.
    #[error("unable to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl CollectError {
    /// Stable name used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            CollectError::UrlParse { .. } => "url_parse",
            CollectError::Request { .. } => "request",
            CollectError::BadStatus { .. } => "bad_status",
            CollectError::UnsupportedContentType { .. } => "unsupported_content_type",
            CollectError::Decode { .. } => "decode",
            CollectError::Task { .. } => "task",
            CollectError::Client(_) => "client",
        }
    }

    /// The endpoint this error belongs to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            CollectError::UrlParse { url, .. }
            | CollectError::Request { url, .. }
            | CollectError::BadStatus { url, .. }
            | CollectError::UnsupportedContentType { url, .. }
            | CollectError::Decode { url, .. }
            | CollectError::Task { url, .. } => Some(url),
            CollectError::Client(_) => None,
        }
    }
}

/// Result type for collection operations.
pub type CollectResult<T> = Result<T, CollectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CollectError::BadStatus {
            url: "http://lb/status".into(),
            status: "500 Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "http://lb/status returned HTTP status 500 Internal Server Error"
        );
        assert_eq!(err.kind(), "bad_status");
        assert_eq!(err.url(), Some("http://lb/status"));

        let err = CollectError::UnsupportedContentType {
            url: "http://lb/status".into(),
            content_type: "text/html".into(),
        };
        assert!(err.to_string().ends_with("unexpected content type text/html"));
    }

    #[test]
    fn test_url_parse_keeps_source() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = CollectError::UrlParse {
            url: "not a url".into(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("unable to parse address 'not a url'"));
    }
}
