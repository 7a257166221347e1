//! Prometheus sink.
//!
//! Records are published through the `metrics` facade, so they appear on the
//! exporter installed by `observability::metrics::init_metrics`.
//!
//! - integer field `f` of measurement `m` → gauge `m_f{tags}`
//! - text field `f` → state gauge `m_f{tags, f="<value>"}`, 1 for the current
//!   value and 0 for the value it replaced
//!
//! Series identity is the record's tags only, so a peer flipping from `up` to
//! `down` keeps a single `fall`/`rise` series. At the end of every cycle any
//! series that was not written again (failed endpoint, vanished peer) is
//! cleared: value gauges become NaN and state gauges 0.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use metrics::Label;

use crate::collector::error::CollectError;
use crate::mapping::{FieldValue, MetricRecord};
use crate::sink::Accumulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SeriesKind {
    Value,
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Series {
    kind: SeriesKind,
    name: String,
    labels: Vec<(String, String)>,
}

impl Series {
    fn new(kind: SeriesKind, name: String, labels: Vec<(String, String)>) -> Self {
        Self { kind, name, labels }
    }

    fn with_label(&self, key: &str, value: &str) -> Self {
        let mut labels = self.labels.clone();
        labels.push((key.to_string(), value.to_string()));
        Self::new(self.kind, self.name.clone(), labels)
    }

    fn set(&self, value: f64) {
        let labels: Vec<Label> = self
            .labels
            .iter()
            .map(|(k, v)| Label::new(k.clone(), v.clone()))
            .collect();
        metrics::gauge!(self.name.clone(), labels).set(value);
    }

    fn clear(&self) {
        match self.kind {
            SeriesKind::Value => self.set(f64::NAN),
            SeriesKind::State => self.set(0.0),
        }
    }
}

#[derive(Debug, Default)]
struct SeriesState {
    /// Written since the last `end_cycle`.
    current: HashSet<Series>,
    /// Written during the previous cycle.
    previous: HashSet<Series>,
    /// Live state series per text field, keyed by the series without its value label.
    states: HashMap<Series, Series>,
}

/// Publishes records as gauges.
#[derive(Debug, Default)]
pub struct PrometheusSink {
    series: Mutex<SeriesState>,
}

impl PrometheusSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SeriesState> {
        self.series.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Accumulator for PrometheusSink {
    fn add_record(&self, record: MetricRecord) {
        let tags: Vec<(String, String)> = record
            .tags
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut state = self.state();
        for (field, value) in &record.fields {
            let name = format!("{}_{}", record.name, field);
            match value {
                FieldValue::Integer(v) => {
                    let series = Series::new(SeriesKind::Value, name, tags.clone());
                    series.set(*v as f64);
                    state.current.insert(series);
                }
                FieldValue::Text(text) => {
                    let owner = Series::new(SeriesKind::State, name, tags.clone());
                    let series = owner.with_label(field, text);
                    if let Some(replaced) = state.states.insert(owner, series.clone()) {
                        if replaced != series {
                            replaced.clear();
                            state.current.remove(&replaced);
                        }
                    }
                    series.set(1.0);
                    state.current.insert(series);
                }
            }
        }
    }

    fn add_error(&self, error: CollectError) {
        // Counted by the collector as `upstream_check_errors_total`.
        tracing::warn!(kind = error.kind(), error = %error, "Endpoint collection failed");
    }

    fn end_cycle(&self) {
        let mut guard = self.state();
        let state = &mut *guard;

        let mut stale = 0usize;
        for series in state.previous.difference(&state.current) {
            series.clear();
            stale += 1;
        }
        if stale > 0 {
            tracing::debug!(stale, "Cleared series not refreshed this cycle");
        }

        let current = &state.current;
        state.states.retain(|_, live| current.contains(live));
        state.previous = std::mem::take(&mut state.current);
    }
}
