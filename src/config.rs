//! Configuration Module
//!
//! Handles loading and managing engine configuration from environment variables.

use std::env;

/// Engine configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Every threshold the engine or benchmarker compares against lives here; none
/// of them are hardcoded at call sites.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum number of entries the primary cache can hold
    pub cache_capacity: usize,
    /// Maximum number of entries the processor's response cache can hold
    pub response_cache_capacity: usize,
    /// Number of workers in the executor pool
    pub workers: usize,
    /// Bound of the executor's submission queue
    pub queue_capacity: usize,
    /// Number of operations issued per benchmark batch
    pub batch_size: usize,
    /// Load level above which the processor reports not-ready
    pub readiness_threshold: f64,
    /// Load added per processed request
    pub load_increment: f64,
    /// Load decayed per second of idle time
    pub load_decay_per_sec: f64,
    /// Minimum ops/sec the throughput benchmark must reach
    pub throughput_floor: f64,
    /// Maximum average response time (seconds) the latency benchmark may report
    pub latency_ceiling: f64,
    /// Maximum errors/sec the stress test may report while staying "stable"
    pub error_ceiling: f64,
    /// Wall-clock duration in seconds for each benchmark run
    pub bench_duration_secs: u64,
}

impl EngineConfig {
    /// Creates a new EngineConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Primary cache capacity (default: 10000)
    /// - `RESPONSE_CACHE_CAPACITY` - Response cache capacity (default: 1000)
    /// - `WORKERS` - Worker pool size (default: 8)
    /// - `QUEUE_CAPACITY` - Executor queue bound (default: 256)
    /// - `BATCH_SIZE` - Benchmark batch size (default: 50)
    /// - `READINESS_THRESHOLD` - Load readiness threshold (default: 0.8)
    /// - `LOAD_INCREMENT` - Load added per request (default: 0.1)
    /// - `LOAD_DECAY_PER_SEC` - Load decay rate (default: 0.1)
    /// - `THROUGHPUT_FLOOR` - Throughput target in ops/sec (default: 1000)
    /// - `LATENCY_CEILING` - Latency target in seconds (default: 0.1)
    /// - `ERROR_CEILING` - Stress error-rate target in errors/sec (default: 0.01)
    /// - `BENCH_DURATION` - Benchmark duration in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: env_or("CACHE_CAPACITY", defaults.cache_capacity),
            response_cache_capacity: env_or(
                "RESPONSE_CACHE_CAPACITY",
                defaults.response_cache_capacity,
            ),
            workers: env_or("WORKERS", defaults.workers),
            queue_capacity: env_or("QUEUE_CAPACITY", defaults.queue_capacity),
            batch_size: env_or("BATCH_SIZE", defaults.batch_size),
            readiness_threshold: env_or("READINESS_THRESHOLD", defaults.readiness_threshold),
            load_increment: env_or("LOAD_INCREMENT", defaults.load_increment),
            load_decay_per_sec: env_or("LOAD_DECAY_PER_SEC", defaults.load_decay_per_sec),
            throughput_floor: env_or("THROUGHPUT_FLOOR", defaults.throughput_floor),
            latency_ceiling: env_or("LATENCY_CEILING", defaults.latency_ceiling),
            error_ceiling: env_or("ERROR_CEILING", defaults.error_ceiling),
            bench_duration_secs: env_or("BENCH_DURATION", defaults.bench_duration_secs),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 10_000,
            response_cache_capacity: 1_000,
            workers: 8,
            queue_capacity: 256,
            batch_size: 50,
            readiness_threshold: 0.8,
            load_increment: 0.1,
            load_decay_per_sec: 0.1,
            throughput_floor: 1_000.0,
            latency_ceiling: 0.1,
            error_ceiling: 0.01,
            bench_duration_secs: 10,
        }
    }
}

/// Reads an environment variable, falling back to `default` when the variable
/// is unset or fails to parse.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_capacity, 10_000);
        assert_eq!(config.response_cache_capacity, 1_000);
        assert_eq!(config.workers, 8);
        assert_eq!(config.queue_capacity, 256);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.readiness_threshold, 0.8);
        assert_eq!(config.throughput_floor, 1_000.0);
        assert_eq!(config.latency_ceiling, 0.1);
        assert_eq!(config.error_ceiling, 0.01);
        assert_eq!(config.bench_duration_secs, 10);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("WORKERS");
        env::remove_var("BATCH_SIZE");
        env::remove_var("THROUGHPUT_FLOOR");

        let config = EngineConfig::from_env();
        assert_eq!(config.cache_capacity, 10_000);
        assert_eq!(config.workers, 8);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.throughput_floor, 1_000.0);
    }

    #[test]
    fn test_env_or_ignores_unparseable_values() {
        env::set_var("PERFCORE_TEST_BAD_USIZE", "not_a_number");
        let value: usize = env_or("PERFCORE_TEST_BAD_USIZE", 42);
        assert_eq!(value, 42);
        env::remove_var("PERFCORE_TEST_BAD_USIZE");
    }
}
