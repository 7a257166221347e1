//! In-memory accumulator.

use std::sync::Mutex;

use crate::collector::error::CollectError;
use crate::mapping::MetricRecord;
use crate::sink::Accumulator;

/// Keeps every record and error it receives.
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    records: Mutex<Vec<MetricRecord>>,
    errors: Mutex<Vec<CollectError>>,
}

impl MemoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected records, leaving the accumulator empty.
    pub fn take_records(&self) -> Vec<MetricRecord> {
        std::mem::take(&mut *lock(&self.records))
    }

    /// Take the collected errors, leaving the accumulator empty.
    pub fn take_errors(&self) -> Vec<CollectError> {
        std::mem::take(&mut *lock(&self.errors))
    }

    pub fn record_count(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn error_count(&self) -> usize {
        lock(&self.errors).len()
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_record(&self, record: MetricRecord) {
        lock(&self.records).push(record);
    }

    fn add_error(&self, error: CollectError) {
        lock(&self.errors).push(error);
    }
}

// A poisoned lock still holds valid data for an append-only list.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
