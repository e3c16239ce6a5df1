//! Request Processor Module
//!
//! Accepts typed requests, coalesces repeats through a canonical-hash
//! response cache, tracks shared load state, and routes cache misses to a
//! small fixed handler set via the worker pool.

mod handlers;
mod state;

pub use state::{ProcessingState, StateSnapshot};

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{BoundedCache, CacheStats};
use crate::executor::ConcurrentExecutor;
use crate::metrics::{Metrics, OpKind};
use crate::models::{HandlerResponse, ProcessOutcome, ProcessRequest, ResponseSource};

// == Processor Config ==
/// Load-model parameters, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct ProcessorConfig {
    pub response_cache_capacity: usize,
    pub load_increment: f64,
    pub load_decay_per_sec: f64,
    pub readiness_threshold: f64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            response_cache_capacity: 1_000,
            load_increment: 0.1,
            load_decay_per_sec: 0.1,
            readiness_threshold: 0.8,
        }
    }
}

// == Request Processor ==
/// Concurrent request processor with response coalescing.
///
/// The response cache is its own `BoundedCache` behind its own lock,
/// independent of any primary cache; no operation ever holds both. The load
/// state lock is never held across an await.
#[derive(Debug)]
pub struct RequestProcessor {
    response_cache: Arc<RwLock<BoundedCache<HandlerResponse>>>,
    state: Mutex<ProcessingState>,
    executor: Arc<ConcurrentExecutor>,
    metrics: Arc<Metrics>,
    config: ProcessorConfig,
}

impl RequestProcessor {
    // == Constructor ==
    pub fn new(config: ProcessorConfig, executor: Arc<ConcurrentExecutor>) -> Self {
        debug!(
            response_cache_capacity = config.response_cache_capacity,
            "request processor initialized"
        );
        Self {
            response_cache: Arc::new(RwLock::new(BoundedCache::new(
                config.response_cache_capacity,
            ))),
            state: Mutex::new(ProcessingState::new()),
            executor,
            metrics: Arc::new(Metrics::new()),
            config,
        }
    }

    // == Process ==
    /// Serves one request.
    ///
    /// The response cache is consulted before any state mutation or handler
    /// dispatch; a hit is the dominant low-latency path. On a miss the load
    /// state absorbs one increment, the handler runs as a pool job (so a
    /// panicking handler is contained), and only successful responses are
    /// cached. Failures of any kind come back as `source = error` with the
    /// message in the response body.
    pub async fn process(&self, request: ProcessRequest) -> ProcessOutcome {
        let start = Instant::now();

        if let Some(message) = request.validate() {
            // Validation failures touch neither the caches nor the load state
            let error = crate::error::EngineError::InvalidRequest(message);
            self.metrics.record(OpKind::Process, start.elapsed(), false);
            return ProcessOutcome {
                response: HandlerResponse::failure(request.kind, error.to_string()),
                request_id: request.id,
                response_time: start.elapsed().as_secs_f64(),
                source: ResponseSource::Error,
                state: self.state_snapshot(),
            };
        }

        let hash = request.canonical_hash();

        // Step 1: response cache
        let cached = {
            let mut cache = self.response_cache.write().await;
            cache.retrieve(&hash)
        };
        if let Some(response) = cached {
            self.metrics.record(OpKind::Process, start.elapsed(), true);
            return ProcessOutcome {
                request_id: request.id,
                response,
                response_time: start.elapsed().as_secs_f64(),
                source: ResponseSource::Cache,
                state: self.state_snapshot(),
            };
        }

        // Step 2: absorb this request into the load state
        let snapshot = {
            let mut state = self.lock_state();
            state.record_load(
                self.config.load_increment,
                self.config.load_decay_per_sec,
                self.config.readiness_threshold,
            )
        };

        // Step 3: dispatch the handler on the pool
        let job_request = request.clone();
        let result = self
            .executor
            .submit(async move { handlers::dispatch(&job_request, &snapshot) })
            .await;

        match result {
            Ok(response) => {
                // Step 4: only successful responses enter the cache
                {
                    let mut cache = self.response_cache.write().await;
                    if let Err(error) = cache.store(hash, response.clone(), None) {
                        warn!(%error, "response cache rejected entry");
                    }
                }
                self.metrics.record(OpKind::Process, start.elapsed(), true);
                ProcessOutcome {
                    request_id: request.id,
                    response,
                    response_time: start.elapsed().as_secs_f64(),
                    source: ResponseSource::Processed,
                    state: snapshot,
                }
            }
            Err(error) => {
                debug!(%error, request_id = %request.id, "handler failed");
                self.metrics.record(OpKind::Process, start.elapsed(), false);
                ProcessOutcome {
                    response: HandlerResponse::failure(request.kind, error.to_string()),
                    request_id: request.id,
                    response_time: start.elapsed().as_secs_f64(),
                    source: ResponseSource::Error,
                    state: snapshot,
                }
            }
        }
    }

    // == State Snapshot ==
    /// Current load state without mutating it.
    pub fn state_snapshot(&self) -> StateSnapshot {
        self.lock_state().snapshot()
    }

    // == Response Cache Stats ==
    /// Counters of the private response cache.
    pub async fn response_cache_stats(&self) -> CacheStats {
        let cache = self.response_cache.read().await;
        cache.stats()
    }

    // == Clear Response Cache ==
    /// Drops all cached responses; counters are preserved.
    pub async fn clear_response_cache(&self) {
        let mut cache = self.response_cache.write().await;
        cache.clear();
    }

    // == Metrics ==
    /// The processor's operation metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ProcessingState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
