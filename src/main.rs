//! Perfcore - engine benchmark runner
//!
//! Wires the cache engine, request processor, and benchmarker together from
//! environment configuration, runs the full suite, and prints the combined
//! report as JSON on stdout.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use perfcore::bench::{BenchTargets, Benchmarker};
use perfcore::config::EngineConfig;
use perfcore::engine::CacheEngine;
use perfcore::executor::ConcurrentExecutor;
use perfcore::processor::{ProcessorConfig, RequestProcessor};

/// Entry point for the benchmark runner.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shared worker pool, cache engine, and request processor
/// 4. Run the benchmark suite for the configured duration
/// 5. Print the suite report as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perfcore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Perfcore benchmark runner");

    let config = EngineConfig::from_env();
    info!(
        "Configuration loaded: cache_capacity={}, workers={}, batch_size={}, bench_duration={}s",
        config.cache_capacity, config.workers, config.batch_size, config.bench_duration_secs
    );

    let executor = Arc::new(ConcurrentExecutor::new(config.workers, config.queue_capacity));
    let engine = Arc::new(CacheEngine::new(config.cache_capacity, Arc::clone(&executor)));
    let processor = Arc::new(RequestProcessor::new(
        ProcessorConfig {
            response_cache_capacity: config.response_cache_capacity,
            load_increment: config.load_increment,
            load_decay_per_sec: config.load_decay_per_sec,
            readiness_threshold: config.readiness_threshold,
        },
        Arc::clone(&executor),
    ));
    let benchmarker = Benchmarker::new(
        Arc::clone(&engine),
        Arc::clone(&processor),
        BenchTargets {
            throughput_floor: config.throughput_floor,
            latency_ceiling: config.latency_ceiling,
            error_ceiling: config.error_ceiling,
        },
        config.batch_size,
    );

    let report = benchmarker
        .run_full_suite(Duration::from_secs(config.bench_duration_secs))
        .await;

    info!(
        "Suite finished: grade={}, overall_score={:.1}, all_targets_achieved={}",
        report.grade, report.overall_score, report.all_targets_achieved
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
