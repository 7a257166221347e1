//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the collector.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sample configuration printed by `--print-sample-config`.
pub const SAMPLE_CONFIG: &str = r#"# Status pages of nginx upstream_check_module to poll.
urls = ["http://localhost/status?format=json"]

# HTTP response timeout in milliseconds (values below 1000 fall back to 5000).
response_timeout_ms = 5000

# Seconds between collection cycles.
interval_secs = 10

# Upper bound on concurrent requests per cycle (0 = one per URL).
max_in_flight = 0

[output]
# "json" writes one JSON line per record to stdout.
# "prometheus" exposes records on the metrics endpoint.
format = "json"

[observability]
log_level = "info"
metrics_enabled = false
metrics_address = "0.0.0.0:9273"
"#;

/// Root configuration for the collector.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Status page URLs, one collection task per entry.
    pub urls: Vec<String>,

    /// Response timeout in milliseconds.
    pub response_timeout_ms: u64,

    /// Interval between collection cycles in seconds.
    pub interval_secs: u64,

    /// Maximum concurrent endpoint requests (0 = unbounded).
    pub max_in_flight: usize,

    /// Where collected records go.
    pub output: OutputConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            urls: vec!["http://localhost/status?format=json".to_string()],
            response_timeout_ms: 5000,
            interval_secs: 10,
            max_in_flight: 0,
            output: OutputConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Configured response timeout, before defaulting.
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Concurrency bound, `None` when unbounded.
    pub fn in_flight_limit(&self) -> Option<usize> {
        match self.max_in_flight {
            0 => None,
            n => Some(n),
        }
    }
}

/// Record output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON lines on stdout.
    #[default]
    Json,
    /// Gauges on the Prometheus endpoint.
    Prometheus,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9273".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses() {
        let config: CollectorConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.urls, vec!["http://localhost/status?format=json"]);
        assert_eq!(config.response_timeout(), Duration::from_secs(5));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.in_flight_limit().is_none());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CollectorConfig = toml::from_str(
            r#"
            urls = ["http://a/status", "https://b:9443/status"]
            max_in_flight = 4

            [output]
            format = "prometheus"
            "#,
        )
        .unwrap();

        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.in_flight_limit(), Some(4));
        assert_eq!(config.output.format, OutputFormat::Prometheus);
        assert_eq!(config.observability.log_level, "info");
    }
}
