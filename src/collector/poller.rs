//! Periodic collection.
//!
//! # Responsibilities
//! - Run a collection cycle every `interval_secs`
//! - Swap in a new Collector when the config file changes
//! - Stop after the current cycle on shutdown

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Interval, MissedTickBehavior};

use crate::collector::orchestrator::Collector;
use crate::config::CollectorConfig;
use crate::sink::Accumulator;

pub struct Poller {
    config: CollectorConfig,
    collector: Collector,
    sink: Arc<dyn Accumulator>,
}

impl Poller {
    pub fn new(config: CollectorConfig, sink: Arc<dyn Accumulator>) -> Self {
        let collector = Collector::from_config(&config);
        Self {
            config,
            collector,
            sink,
        }
    }

    pub fn collector(&self) -> &Collector {
        &self.collector
    }

    /// Run a single cycle.
    pub async fn run_once(&self) {
        if let Err(e) = self.collector.gather(self.sink.as_ref()).await {
            tracing::error!(error = %e, "Collection cycle failed");
        }
    }

    /// Poll until shutdown.
    pub async fn run(
        mut self,
        mut shutdown: broadcast::Receiver<()>,
        mut config_updates: mpsc::UnboundedReceiver<CollectorConfig>,
    ) {
        tracing::info!(
            endpoints = self.config.urls.len(),
            interval_secs = self.config.interval_secs,
            "Poller starting"
        );

        let mut ticker = new_ticker(&self.config);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_once().await;
                }
                Some(new_config) = config_updates.recv() => {
                    if new_config.interval_secs != self.config.interval_secs {
                        ticker = delayed_ticker(&new_config);
                    }
                    self.apply(new_config);
                }
                _ = shutdown.recv() => {
                    tracing::info!("Poller received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Replace the collector; the next cycle uses the new URLs and timeout.
    ///
    /// Output format, logging and exporter settings are fixed at startup;
    /// changes to them are reported and take effect on restart.
    pub fn apply(&mut self, config: CollectorConfig) {
        let pending = restart_required(&self.config, &config);
        if !pending.is_empty() {
            tracing::warn!(
                keys = ?pending,
                "Reloaded configuration changes settings that only apply after a restart"
            );
        }
        tracing::info!(
            endpoints = config.urls.len(),
            interval_secs = config.interval_secs,
            response_timeout_ms = config.response_timeout_ms,
            "Applying reloaded configuration"
        );
        self.collector = Collector::from_config(&config);
        self.config = config;
    }
}

/// Keys that differ between `current` and `next` but are only read at startup.
fn restart_required(current: &CollectorConfig, next: &CollectorConfig) -> Vec<&'static str> {
    let mut keys = Vec::new();
    if current.output.format != next.output.format {
        keys.push("output.format");
    }
    if current.observability.log_level != next.observability.log_level {
        keys.push("observability.log_level");
    }
    if current.observability.metrics_enabled != next.observability.metrics_enabled {
        keys.push("observability.metrics_enabled");
    }
    if current.observability.metrics_address != next.observability.metrics_address {
        keys.push("observability.metrics_address");
    }
    keys
}

fn new_ticker(config: &CollectorConfig) -> Interval {
    let mut ticker = time::interval(config.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

// The first tick of a fresh interval fires immediately; after a reload the
// next cycle should wait a full period instead.
fn delayed_ticker(config: &CollectorConfig) -> Interval {
    let mut ticker = time::interval_at(time::Instant::now() + config.interval(), config.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::sink::MemoryAccumulator;

    #[test]
    fn test_apply_rebuilds_collector() {
        let sink = Arc::new(MemoryAccumulator::new());
        let mut poller = Poller::new(CollectorConfig::default(), sink);
        assert_eq!(poller.collector().urls().len(), 1);

        let mut config = CollectorConfig::default();
        config.urls = vec!["http://a/status".into(), "http://b/status".into()];
        config.response_timeout_ms = 3000;
        poller.apply(config);

        assert_eq!(poller.collector().urls().len(), 2);
        assert_eq!(
            poller.collector().response_timeout(),
            std::time::Duration::from_secs(3)
        );
    }

    #[test]
    fn test_restart_only_keys_are_detected() {
        let current = CollectorConfig::default();

        let mut next = CollectorConfig::default();
        next.urls = vec!["http://other/status".into()];
        next.interval_secs = 60;
        assert!(restart_required(&current, &next).is_empty());

        next.output.format = OutputFormat::Prometheus;
        next.observability.log_level = "debug".into();
        assert_eq!(
            restart_required(&current, &next),
            vec!["output.format", "observability.log_level"]
        );

        next.observability.metrics_enabled = true;
        next.observability.metrics_address = "127.0.0.1:9100".into();
        assert_eq!(restart_required(&current, &next).len(), 4);
    }

    #[test]
    fn test_apply_keeps_startup_only_settings_pending() {
        let sink = Arc::new(MemoryAccumulator::new());
        let mut poller = Poller::new(CollectorConfig::default(), sink);

        let mut config = CollectorConfig::default();
        config.urls = vec!["http://a/status".into()];
        config.observability.log_level = "trace".into();
        poller.apply(config);

        // The new URL list is live; the log level is recorded but unchanged at runtime.
        assert_eq!(poller.collector().urls(), ["http://a/status".to_string()]);
        assert_eq!(poller.config.observability.log_level, "trace");
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let sink = Arc::new(MemoryAccumulator::new());
        let mut config = CollectorConfig::default();
        config.urls = vec!["not a url".into()];
        let poller = Poller::new(config, sink.clone());

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let (_updates_tx, updates_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(poller.run(shutdown_rx, updates_rx));

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        shutdown_tx.send(()).unwrap();
        task.await.unwrap();

        // The immediate first tick ran one cycle.
        assert_eq!(sink.error_count(), 1);
    }
}
