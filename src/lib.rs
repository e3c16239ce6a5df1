//! Perfcore - a concurrent in-memory cache and request-processing engine
//!
//! Provides a bounded LRU cache behind a fixed worker pool, a coalescing
//! request processor, and a benchmarker that grades the whole engine
//! against configured throughput, latency, and stability targets.

pub mod bench;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod models;
pub mod processor;

pub use bench::{BenchTargets, Benchmarker, BenchmarkReport, SuiteReport};
pub use cache::BoundedCache;
pub use config::EngineConfig;
pub use engine::CacheEngine;
pub use error::{EngineError, Result};
pub use executor::ConcurrentExecutor;
pub use metrics::{Metrics, MetricsSnapshot, OpKind};
pub use models::{ProcessRequest, ProcessOutcome, RequestKind, ResponseSource};
pub use processor::{ProcessorConfig, RequestProcessor, StateSnapshot};
