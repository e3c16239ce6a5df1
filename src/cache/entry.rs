//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry with its value and access bookkeeping.
///
/// An entry is owned exclusively by the cache that created it and is dropped
/// on eviction or an explicit clear.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Caller-supplied metadata, empty when none was given
    pub metadata: HashMap<String, String>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Timestamp of the most recent access (Unix milliseconds)
    pub last_access_at: u64,
    /// Number of retrievals served while the entry has been cached
    pub access_count: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry with optional metadata.
    pub fn new(value: V, metadata: Option<HashMap<String, String>>) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            metadata: metadata.unwrap_or_default(),
            created_at: now,
            last_access_at: now,
            access_count: 0,
        }
    }

    // == Touch ==
    /// Records a retrieval: bumps the access count and refreshes the
    /// last-access timestamp.
    pub fn touch(&mut self) {
        self.access_count += 1;
        self.last_access_at = current_timestamp_ms();
    }

    // == Refresh ==
    /// Replaces the value (and metadata, when supplied) on overwrite.
    ///
    /// The entry never left the cache, so `created_at` and `access_count`
    /// are preserved; only the last-access timestamp moves.
    pub fn refresh(&mut self, value: V, metadata: Option<HashMap<String, String>>) {
        self.value = value;
        if let Some(metadata) = metadata {
            self.metadata = metadata;
        }
        self.last_access_at = current_timestamp_ms();
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), None);

        assert_eq!(entry.value, "test_value");
        assert!(entry.metadata.is_empty());
        assert_eq!(entry.access_count, 0);
        assert_eq!(entry.created_at, entry.last_access_at);
    }

    #[test]
    fn test_entry_creation_with_metadata() {
        let mut metadata = HashMap::new();
        metadata.insert("origin".to_string(), "unit-test".to_string());

        let entry = CacheEntry::new(42u64, Some(metadata));
        assert_eq!(entry.value, 42);
        assert_eq!(entry.metadata.get("origin").map(String::as_str), Some("unit-test"));
    }

    #[test]
    fn test_touch_increments_access_count() {
        let mut entry = CacheEntry::new("v".to_string(), None);

        entry.touch();
        entry.touch();
        entry.touch();

        assert_eq!(entry.access_count, 3);
        assert!(entry.last_access_at >= entry.created_at);
    }

    #[test]
    fn test_refresh_preserves_creation_and_access_count() {
        let mut entry = CacheEntry::new("old".to_string(), None);
        entry.touch();
        let created = entry.created_at;

        entry.refresh("new".to_string(), None);

        assert_eq!(entry.value, "new");
        assert_eq!(entry.created_at, created);
        assert_eq!(entry.access_count, 1);
    }

    #[test]
    fn test_refresh_keeps_metadata_when_none_supplied() {
        let mut metadata = HashMap::new();
        metadata.insert("k".to_string(), "v".to_string());
        let mut entry = CacheEntry::new(1u32, Some(metadata));

        entry.refresh(2, None);
        assert_eq!(entry.metadata.get("k").map(String::as_str), Some("v"));

        let mut replacement = HashMap::new();
        replacement.insert("k2".to_string(), "v2".to_string());
        entry.refresh(3, Some(replacement));
        assert!(entry.metadata.get("k").is_none());
        assert_eq!(entry.metadata.get("k2").map(String::as_str), Some("v2"));
    }
}
