//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Every problem is reported, not
//! just the first. URL syntax is deliberately left to the collector: a bad
//! URL costs only its own endpoint.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{CollectorConfig, OutputFormat};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoUrls,
    ZeroInterval,
    UnknownLogLevel(String),
    InvalidMetricsAddress(String),
    PrometheusWithoutMetrics,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoUrls => write!(f, "no urls configured"),
            ValidationError::ZeroInterval => write!(f, "interval_secs must be greater than 0"),
            ValidationError::UnknownLogLevel(level) => write!(f, "unknown log level '{}'", level),
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "invalid metrics address '{}'", addr)
            }
            ValidationError::PrometheusWithoutMetrics => {
                write!(f, "output format 'prometheus' requires metrics_enabled = true")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed configuration.
pub fn validate_config(config: &CollectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.urls.is_empty() {
        errors.push(ValidationError::NoUrls);
    }

    if config.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.output.format == OutputFormat::Prometheus && !config.observability.metrics_enabled {
        errors.push(ValidationError::PrometheusWithoutMetrics);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
