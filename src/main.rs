//! upstream-check daemon.
//!
//! Polls nginx `upstream_check_module` status pages and emits health records.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ config::loader ──▶ CollectorConfig
//!        │                                  │
//!        └── config::watcher (reload) ──────┤
//!                                           ▼
//!                                 collector::Poller (interval)
//!                                           │
//!                                           ▼
//!                                 collector::Collector
//!            ┌──────────────────────┬───────┴──────────────┐
//!            ▼                      ▼                      ▼
//!      task per URL           task per URL           task per URL
//!   resolve → fetch →      resolve → fetch →      resolve → fetch →
//!   decode → map           decode → map           decode → map
//!            └──────────────────────┴───────┬──────────────┘
//!                                           ▼
//!                              sink (JSON lines | Prometheus)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use upstream_check::collector::Poller;
use upstream_check::config::schema::SAMPLE_CONFIG;
use upstream_check::config::watcher::ConfigWatcher;
use upstream_check::config::{load_config, OutputFormat};
use upstream_check::lifecycle::{signals, Shutdown};
use upstream_check::observability::{logging, metrics};
use upstream_check::sink::{Accumulator, JsonLinesSink, PrometheusSink};

#[derive(Parser)]
#[command(name = "upstream-check")]
#[command(about = "Poll nginx upstream_check_module status pages", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "upstream-check.toml")]
    config: PathBuf,

    /// Run a single collection cycle and exit.
    #[arg(long)]
    once: bool,

    /// Print a sample configuration and exit.
    #[arg(long)]
    print_sample_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_sample_config {
        print!("{}", SAMPLE_CONFIG);
        return Ok(());
    }

    let config = load_config(&args.config)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        path = %args.config.display(),
        endpoints = config.urls.len(),
        interval_secs = config.interval_secs,
        response_timeout_ms = config.response_timeout_ms,
        "upstream-check v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let sink: Arc<dyn Accumulator> = match config.output.format {
        OutputFormat::Json => Arc::new(JsonLinesSink::stdout()),
        OutputFormat::Prometheus => Arc::new(PrometheusSink::new()),
    };

    let poller = Poller::new(config, sink);

    if args.once {
        poller.run_once().await;
        return Ok(());
    }

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_handler(shutdown.clone());

    let (watcher, config_updates) = ConfigWatcher::new(&args.config);
    // Keep the watcher alive for the life of the poller.
    let _watcher = match watcher.run() {
        Ok(w) => Some(w),
        Err(e) => {
            tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
            None
        }
    };

    poller.run(shutdown.subscribe(), config_updates).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
