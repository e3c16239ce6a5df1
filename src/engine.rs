//! Cache Engine Module
//!
//! Async facade over a locked `BoundedCache`: every operation runs as a job
//! on the shared worker pool and is recorded in the engine metrics. This is
//! the surface the benchmarker drives for store/retrieve load.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{BoundedCache, CacheStats};
use crate::error::Result;
use crate::executor::ConcurrentExecutor;
use crate::metrics::{Metrics, OpKind};

// == Cache Engine ==
/// Concurrent front end for one `BoundedCache` instance.
///
/// The cache is a single critical section behind a write lock; the executor
/// bounds how many operations are in flight at once; metrics see every
/// completed operation.
#[derive(Debug)]
pub struct CacheEngine<V> {
    cache: Arc<RwLock<BoundedCache<V>>>,
    executor: Arc<ConcurrentExecutor>,
    metrics: Arc<Metrics>,
}

impl<V> CacheEngine<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an engine over a fresh cache of the given capacity, sharing
    /// the provided worker pool.
    pub fn new(capacity: usize, executor: Arc<ConcurrentExecutor>) -> Self {
        debug!(capacity, "cache engine initialized");
        Self {
            cache: Arc::new(RwLock::new(BoundedCache::new(capacity))),
            executor,
            metrics: Arc::new(Metrics::new()),
        }
    }

    // == Store ==
    /// Stores a key-value pair with optional metadata.
    pub async fn store(
        &self,
        key: String,
        value: V,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<()> {
        let cache = Arc::clone(&self.cache);
        let start = Instant::now();

        let result = self
            .executor
            .submit(async move {
                let mut guard = cache.write().await;
                guard.store(key, value, metadata)
            })
            .await;

        self.metrics
            .record(OpKind::Store, start.elapsed(), result.is_ok());
        result
    }

    // == Retrieve ==
    /// Retrieves a value by key; an absent key yields `Ok(None)`.
    pub async fn retrieve(&self, key: String) -> Result<Option<V>> {
        let cache = Arc::clone(&self.cache);
        let start = Instant::now();

        let result = self
            .executor
            .submit(async move {
                let mut guard = cache.write().await;
                Ok(guard.retrieve(&key))
            })
            .await;

        self.metrics
            .record(OpKind::Retrieve, start.elapsed(), result.is_ok());
        result
    }

    // == Batch Store ==
    /// Stores every element, fanning one job per element through the pool.
    ///
    /// Index `i` of the result corresponds to input `i`; a failed element
    /// maps to `false` and never aborts the batch.
    pub async fn batch_store(&self, items: Vec<(String, V)>) -> Vec<bool> {
        let stores = items
            .into_iter()
            .map(|(key, value)| self.store(key, value, None));
        join_all(stores)
            .await
            .into_iter()
            .map(|result| result.is_ok())
            .collect()
    }

    // == Batch Retrieve ==
    /// Retrieves every key, fanning one job per key through the pool.
    ///
    /// Index `i` of the result corresponds to input `i`; submission failures
    /// map to `None` like ordinary misses.
    pub async fn batch_retrieve(&self, keys: Vec<String>) -> Vec<Option<V>> {
        let retrievals = keys.into_iter().map(|key| self.retrieve(key));
        join_all(retrievals)
            .await
            .into_iter()
            .map(|result| result.unwrap_or(None))
            .collect()
    }

    // == Clear ==
    /// Removes all cached entries; counters are preserved.
    pub async fn clear(&self) {
        let mut guard = self.cache.write().await;
        guard.clear();
    }

    // == Cache Stats ==
    /// Returns a snapshot of the underlying cache's counters.
    pub async fn cache_stats(&self) -> CacheStats {
        let guard = self.cache.read().await;
        guard.stats()
    }

    // == Metrics ==
    /// The engine's operation metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
