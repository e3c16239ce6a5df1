//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU recency tracking and
//! a fixed capacity. The value type is opaque to the cache; callers pick it
//! at construction.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH};
use crate::error::{EngineError, Result};

// == Bounded Cache ==
/// Capacity-limited key/value store with LRU eviction.
///
/// All mutating operations run under the caller's lock (the cache itself is
/// not internally synchronized); wrapping an instance in
/// `Arc<RwLock<BoundedCache<V>>>` makes every operation a single critical
/// section. Invariant: `entries` and the recency tracker always hold exactly
/// the same key set, and `entries.len()` never exceeds `capacity`.
#[derive(Debug)]
pub struct BoundedCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Recency tracker driving eviction
    lru: LruTracker,
    /// Operation counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<V: Clone> BoundedCache<V> {
    // == Constructor ==
    /// Creates a new BoundedCache with the given capacity.
    ///
    /// A capacity of zero is clamped to one so the cache can always hold at
    /// least a single entry.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            capacity: capacity.max(1),
        }
    }

    // == Store ==
    /// Inserts or overwrites an entry.
    ///
    /// Inserting a new key at capacity evicts the least recently used entry
    /// first. Overwriting an existing key replaces its value and metadata and
    /// moves it to the most-recently-used position without evicting anything.
    ///
    /// # Arguments
    /// * `key` - The key to store; must be non-empty and at most
    ///   `MAX_KEY_LENGTH` bytes
    /// * `value` - The value to store
    /// * `metadata` - Optional caller metadata kept alongside the value
    pub fn store(
        &mut self,
        key: String,
        value: V,
        metadata: Option<HashMap<String, String>>,
    ) -> Result<()> {
        if key.is_empty() {
            self.stats.record_rejected();
            return Err(EngineError::InvalidKey("key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            self.stats.record_rejected();
            return Err(EngineError::InvalidKey(format!(
                "key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.refresh(value, metadata);
        } else {
            // New key: make room first, then insert
            if self.entries.len() >= self.capacity {
                self.evict()?;
            }
            self.entries
                .insert(key.clone(), CacheEntry::new(value, metadata));
        }

        self.lru.touch(&key);
        self.stats.record_store();
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Retrieve ==
    /// Retrieves a value by key.
    ///
    /// A hit clones the value, bumps the entry's access count, and moves the
    /// key to the most-recently-used position. A miss returns `None` and is
    /// counted; an absent key is not an error.
    pub fn retrieve(&mut self, key: &str) -> Option<V> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                let value = entry.value.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Batch Store ==
    /// Applies `store` to each element in order.
    ///
    /// The result vector has exactly the input length and index `i` holds the
    /// outcome for input `i`; a failing element never aborts the rest of the
    /// batch.
    pub fn batch_store(&mut self, items: Vec<(String, V)>) -> Vec<Result<()>> {
        items
            .into_iter()
            .map(|(key, value)| self.store(key, value, None))
            .collect()
    }

    // == Batch Retrieve ==
    /// Applies `retrieve` to each key in order.
    ///
    /// The result vector has exactly the input length, index-aligned with the
    /// input keys.
    pub fn batch_retrieve(&mut self, keys: &[String]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.retrieve(key)).collect()
    }

    // == Evict ==
    /// Removes the least recently used entry.
    fn evict(&mut self) -> Result<()> {
        match self.lru.pop_lru() {
            Some(lru_key) => {
                self.entries.remove(&lru_key);
                self.stats.record_eviction();
                Ok(())
            }
            None => Err(EngineError::Internal(
                "cache at capacity but recency tracker is empty".to_string(),
            )),
        }
    }

    // == Clear ==
    /// Removes all entries and resets the recency order.
    ///
    /// Hit/miss/eviction/store counters are preserved.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Stats ==
    /// Returns a snapshot of the current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Capacity ==
    /// Returns the fixed capacity set at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // == Contains ==
    /// Checks for a key without touching recency order or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys in the recency tracker; always equals `len()`.
    #[cfg(test)]
    pub(crate) fn tracker_len(&self) -> usize {
        self.lru.len()
    }
}
