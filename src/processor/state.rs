//! Processing State Module
//!
//! The processor's shared load state: a single load level in [0, 1] that
//! rises with each processed request and decays with idle time. Every
//! concurrent `process` call read-modify-writes this state, so the owning
//! processor guards it with a lock that is never held across an await.

use std::time::Instant;

use serde::{Deserialize, Serialize};

// == Processing State ==
/// Mutable load state shared by all callers of one processor.
#[derive(Debug)]
pub struct ProcessingState {
    /// Current load level, clamped to [0, 1]
    load_level: f64,
    /// When the load level was last updated
    last_update: Instant,
    /// Whether the load level is below the readiness threshold
    ready: bool,
}

/// Immutable view of the load state, embedded in every outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub load_level: f64,
    pub ready: bool,
}

impl ProcessingState {
    // == Constructor ==
    /// Creates an idle, ready state.
    pub fn new() -> Self {
        Self {
            load_level: 0.0,
            last_update: Instant::now(),
            ready: true,
        }
    }

    // == Record Load ==
    /// Applies one request's worth of load.
    ///
    /// Prior load decays by `decay_per_sec` for each second elapsed since
    /// the last update, then `increment` is added and the result clamped to
    /// [0, 1]. Readiness reflects the post-update level.
    pub fn record_load(
        &mut self,
        increment: f64,
        decay_per_sec: f64,
        readiness_threshold: f64,
    ) -> StateSnapshot {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        let decayed = (self.load_level - elapsed * decay_per_sec).max(0.0);
        self.load_level = (decayed + increment).clamp(0.0, 1.0);
        self.last_update = now;
        self.ready = self.load_level < readiness_threshold;

        self.snapshot()
    }

    // == Snapshot ==
    /// Returns the current state without mutating it.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            load_level: self.load_level,
            ready: self.ready,
        }
    }
}

impl Default for ProcessingState {
    fn default() -> Self {
        Self::new()
    }
}
