//! Collection orchestration.
//!
//! # Responsibilities
//! - Own the HTTP client, built on first use and reused every cycle
//! - Run resolve → fetch → decode → map for every endpoint concurrently
//! - Keep failures per endpoint; one bad endpoint never costs the others
//!
//! # Design Decisions
//! - One task per endpoint in a `JoinSet`; the call returns after all join
//! - Optional semaphore caps requests in flight
//! - Results are slotted by configuration order, so output is deterministic

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::{OnceCell, Semaphore};
use tokio::task::{Id, JoinError, JoinSet};
use tracing::Instrument;
use uuid::Uuid;

use crate::collector::error::{CollectError, CollectResult};
use crate::config::CollectorConfig;
use crate::fetch::{build_client, effective_timeout, fetch_status};
use crate::mapping::{map_status, MetricRecord};
use crate::observability::metrics as self_metrics;
use crate::sink::Accumulator;
use crate::status::decode_status;
use crate::target::Endpoint;

type EndpointResult = CollectResult<Vec<MetricRecord>>;

/// Output of one collection cycle.
#[derive(Debug, Default)]
pub struct Collection {
    /// Records of every successful endpoint, in configuration order.
    pub records: Vec<MetricRecord>,
    /// One entry per failed endpoint.
    pub errors: Vec<CollectError>,
}

impl Collection {
    /// Hand everything to a sink.
    pub fn drain_into(self, acc: &dyn Accumulator) {
        for record in self.records {
            acc.add_record(record);
        }
        for error in self.errors {
            acc.add_error(error);
        }
    }
}

/// Polls a fixed list of status endpoints.
#[derive(Debug)]
pub struct Collector {
    urls: Vec<String>,
    response_timeout: Duration,
    max_in_flight: Option<usize>,
    client: OnceCell<Client>,
}

impl Collector {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            response_timeout: Duration::ZERO,
            max_in_flight: None,
            client: OnceCell::new(),
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(config.urls.clone())
            .with_response_timeout(config.response_timeout())
            .with_max_in_flight(config.in_flight_limit())
    }

    /// Per-request timeout; below one second falls back to the default.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Cap concurrent requests. `None` or `Some(0)` means one task per URL.
    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.max_in_flight = limit.filter(|n| *n > 0);
        self
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// The timeout requests actually use.
    pub fn response_timeout(&self) -> Duration {
        effective_timeout(self.response_timeout)
    }

    async fn client(&self) -> CollectResult<&Client> {
        self.client
            .get_or_try_init(|| async {
                tracing::debug!(timeout = ?self.response_timeout(), "Building HTTP client");
                build_client(self.response_timeout).map_err(CollectError::Client)
            })
            .await
    }

    /// Collect from every endpoint and push the results into `acc`.
    pub async fn gather(&self, acc: &dyn Accumulator) -> CollectResult<()> {
        let result = self.collect().await.map(|collection| collection.drain_into(acc));
        acc.end_cycle();
        result
    }

    /// Collect from every endpoint.
    ///
    /// Fails only when the HTTP client cannot be built, before any endpoint
    /// is contacted. Endpoint failures are returned inside the `Collection`.
    pub async fn collect(&self) -> CollectResult<Collection> {
        let cycle = Uuid::new_v4();
        let span = tracing::info_span!("collect", cycle = %cycle);
        self.collect_all().instrument(span).await
    }

    async fn collect_all(&self) -> CollectResult<Collection> {
        let started = Instant::now();
        let client = self.client().await?.clone();
        let limit = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));

        let mut slots: Vec<Option<EndpointResult>> =
            self.urls.iter().map(|_| None).collect();
        let mut tasks = JoinSet::new();
        let mut owners: HashMap<Id, (usize, String)> = HashMap::new();

        for (slot, raw) in self.urls.iter().enumerate() {
            let endpoint = match Endpoint::parse(raw) {
                Ok(endpoint) => endpoint,
                Err(e) => {
                    slots[slot] = Some(Err(e));
                    continue;
                }
            };

            let client = client.clone();
            let limit = limit.clone();
            let handle = tasks.spawn(
                async move {
                    let _permit = match limit {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    collect_endpoint(&client, &endpoint).await
                }
                .in_current_span(),
            );
            owners.insert(handle.id(), (slot, raw.clone()));
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            if let Some((slot, result)) = settle(joined, &owners) {
                slots[slot] = Some(result);
            }
        }

        let mut collection = Collection::default();
        for result in slots.into_iter().flatten() {
            match result {
                Ok(records) => collection.records.extend(records),
                Err(e) => {
                    tracing::debug!(kind = e.kind(), error = %e, "Endpoint failed");
                    self_metrics::record_endpoint_error(e.kind());
                    collection.errors.push(e);
                }
            }
        }

        let elapsed = started.elapsed();
        self_metrics::record_cycle(elapsed, self.urls.len());
        tracing::info!(
            endpoints = self.urls.len(),
            records = collection.records.len(),
            errors = collection.errors.len(),
            duration_ms = elapsed.as_millis() as u64,
            "Collection cycle complete"
        );

        Ok(collection)
    }
}

/// Slot and result of a finished endpoint task. A task that panicked or was
/// cancelled becomes a `Task` error for the URL it was spawned for.
fn settle(
    joined: Result<(Id, EndpointResult), JoinError>,
    owners: &HashMap<Id, (usize, String)>,
) -> Option<(usize, EndpointResult)> {
    match joined {
        Ok((id, result)) => owners.get(&id).map(|(slot, _)| (*slot, result)),
        Err(e) => {
            let (slot, url) = owners.get(&e.id())?;
            let message = e.to_string();
            Some((*slot, Err(CollectError::Task { url: url.clone(), message })))
        }
    }
}

/// Resolve, fetch, decode and map a single endpoint.
pub async fn collect_endpoint(client: &Client, endpoint: &Endpoint) -> CollectResult<Vec<MetricRecord>> {
    let body = fetch_status(client, endpoint).await?;
    let status = decode_status(body.as_slice()).map_err(|source| CollectError::Decode {
        url: endpoint.as_str().to_string(),
        source,
    })?;
    Ok(map_status(&status, &endpoint.tags()))
}
