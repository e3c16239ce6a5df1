//! Operation Metrics Module
//!
//! Tracks a bounded window of recent operation durations plus monotonic
//! counters partitioned by operation kind. Shared across tasks; every lock
//! section is short and never held across an await.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

// == Constants ==
/// Number of recent operation durations kept for latency averaging
pub const METRICS_WINDOW: usize = 1000;

// == Operation Kind ==
/// The three kinds of operation the engine tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Store,
    Retrieve,
    Process,
}

// == Metrics ==
/// Shared operation metrics.
///
/// Counters are never reset implicitly; `snapshot` is read-only.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    /// Ring buffer of the most recent operation durations, in seconds
    durations: VecDeque<f64>,
    total_operations: u64,
    successful_operations: u64,
    store_operations: u64,
    retrieve_operations: u64,
    process_operations: u64,
}

/// Read-only view of the metrics, suitable for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total_operations: u64,
    pub successful_operations: u64,
    pub success_rate: f64,
    /// Mean duration in seconds over the recent window, 0.0 when empty
    pub avg_duration_secs: f64,
    pub store_operations: u64,
    pub retrieve_operations: u64,
    pub process_operations: u64,
}

impl Metrics {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Record ==
    /// Records one completed operation.
    pub fn record(&self, kind: OpKind, duration: Duration, success: bool) {
        let mut inner = self.lock();

        if inner.durations.len() == METRICS_WINDOW {
            inner.durations.pop_front();
        }
        inner.durations.push_back(duration.as_secs_f64());

        inner.total_operations += 1;
        if success {
            inner.successful_operations += 1;
        }
        match kind {
            OpKind::Store => inner.store_operations += 1,
            OpKind::Retrieve => inner.retrieve_operations += 1,
            OpKind::Process => inner.process_operations += 1,
        }
    }

    // == Snapshot ==
    /// Returns a point-in-time view without resetting anything.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let inner = self.lock();

        let avg_duration_secs = if inner.durations.is_empty() {
            0.0
        } else {
            inner.durations.iter().sum::<f64>() / inner.durations.len() as f64
        };
        let success_rate = if inner.total_operations == 0 {
            0.0
        } else {
            inner.successful_operations as f64 / inner.total_operations as f64
        };

        MetricsSnapshot {
            total_operations: inner.total_operations,
            successful_operations: inner.successful_operations,
            success_rate,
            avg_duration_secs,
            store_operations: inner.store_operations,
            retrieve_operations: inner.retrieve_operations,
            process_operations: inner.process_operations,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MetricsInner> {
        // Counters stay valid even when a panicking thread held the lock
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
