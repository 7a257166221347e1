//! JSON-lines sink.
//!
//! Each record becomes one line:
//! `{"name":..,"fields":{..},"tags":{..},"timestamp":<unix seconds>}`.
//! Errors are logged, not written.

use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::collector::error::CollectError;
use crate::mapping::{Fields, MetricRecord};
use crate::sink::Accumulator;
use crate::target::Tags;

#[derive(Serialize)]
struct Line<'a> {
    name: &'a str,
    fields: &'a Fields,
    tags: &'a Tags,
    timestamp: u64,
}

/// Writes records as JSON lines to any writer.
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer (used by tests to inspect output).
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_record(&self, record: &MetricRecord) -> std::io::Result<()> {
        let line = Line {
            name: &record.name,
            fields: &record.fields,
            tags: &record.tags,
            timestamp: unix_now(),
        };

        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        serde_json::to_writer(&mut *writer, &line)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl<W: Write + Send> Accumulator for JsonLinesSink<W> {
    fn add_record(&self, record: MetricRecord) {
        if let Err(e) = self.write_record(&record) {
            tracing::error!(measurement = %record.name, error = %e, "Failed to write record");
        }
    }

    fn add_error(&self, error: CollectError) {
        tracing::warn!(kind = error.kind(), error = %error, "Endpoint collection failed");
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
