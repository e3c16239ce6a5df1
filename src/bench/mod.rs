//! Benchmarker Module
//!
//! Drives concurrent load against the cache engine and the request
//! processor for a fixed wall-clock duration and classifies the results
//! against configured targets. The deadline is checked before scheduling
//! each batch; work already in flight is always awaited, never cancelled.

mod report;

pub use report::{
    grade_for_score, latency_score, overall_score, stability_label, stability_score,
    throughput_score, BenchmarkReport, SuiteReport, STABILITY_STABLE, STABILITY_UNSTABLE,
};

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde_json::json;
use tracing::info;

use crate::engine::CacheEngine;
use crate::models::{ProcessRequest, RequestKind, ResponseSource};
use crate::processor::RequestProcessor;

// == Benchmark Targets ==
/// Pass/fail thresholds, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct BenchTargets {
    /// Minimum ops/sec for the throughput run
    pub throughput_floor: f64,
    /// Maximum average latency (seconds) for the latency run
    pub latency_ceiling: f64,
    /// Maximum errors/sec for the stress run
    pub error_ceiling: f64,
}

impl Default for BenchTargets {
    fn default() -> Self {
        Self {
            throughput_floor: 1_000.0,
            latency_ceiling: 0.1,
            error_ceiling: 0.01,
        }
    }
}

/// Number of distinct keys the throughput run cycles through.
const BENCH_KEY_SPACE: usize = 1_000;
/// Stress-run mix per iteration.
const STRESS_STORES_PER_ROUND: usize = 20;
const STRESS_REQUESTS_PER_ROUND: usize = 10;
/// Breather between stress rounds.
const STRESS_PAUSE: Duration = Duration::from_millis(10);

// == Benchmarker ==
/// Load driver for the cache engine and request processor.
#[derive(Debug)]
pub struct Benchmarker {
    engine: Arc<CacheEngine<String>>,
    processor: Arc<RequestProcessor>,
    targets: BenchTargets,
    batch_size: usize,
}

impl Benchmarker {
    // == Constructor ==
    pub fn new(
        engine: Arc<CacheEngine<String>>,
        processor: Arc<RequestProcessor>,
        targets: BenchTargets,
        batch_size: usize,
    ) -> Self {
        Self {
            engine,
            processor,
            targets,
            batch_size: batch_size.max(1),
        }
    }

    // == Throughput Benchmark ==
    /// Issues batches of stores then retrieves against the cache engine
    /// until the deadline, then reports completed operations per second
    /// against the configured floor.
    pub async fn run_throughput_benchmark(&self, duration: Duration) -> BenchmarkReport {
        info!("Throughput benchmark starting for {:.1}s", duration.as_secs_f64());

        let keys: Vec<String> = (0..BENCH_KEY_SPACE).map(|i| format!("bench_key_{}", i)).collect();
        let values: Vec<String> = (0..BENCH_KEY_SPACE)
            .map(|i| format!("bench_value_{}", i).repeat(10))
            .collect();

        let start = Instant::now();
        let mut operations: u64 = 0;
        let mut errors: u64 = 0;
        let mut cursor = 0usize;

        while start.elapsed() < duration {
            let batch: Vec<(String, String)> = (0..self.batch_size)
                .map(|i| {
                    let idx = (cursor + i) % BENCH_KEY_SPACE;
                    (keys[idx].clone(), values[idx].clone())
                })
                .collect();
            let stored = self.engine.batch_store(batch).await;
            errors += stored.iter().filter(|ok| !**ok).count() as u64;
            operations += stored.len() as u64;

            let fetch: Vec<String> = (0..self.batch_size)
                .map(|i| keys[(cursor + i) % BENCH_KEY_SPACE].clone())
                .collect();
            let fetched = self.engine.batch_retrieve(fetch).await;
            operations += fetched.len() as u64;

            cursor = (cursor + self.batch_size) % BENCH_KEY_SPACE;
        }

        let elapsed = start.elapsed().as_secs_f64();
        let ops_per_second = operations as f64 / elapsed;
        let avg_latency = self.engine.metrics().snapshot().avg_duration_secs;
        let target_achieved = ops_per_second >= self.targets.throughput_floor;

        info!(
            "Throughput benchmark completed: {:.1} ops/sec (target_achieved={})",
            ops_per_second, target_achieved
        );

        self.build_report(
            "throughput",
            elapsed,
            operations,
            errors,
            avg_latency,
            target_achieved,
            throughput_score(ops_per_second, self.targets.throughput_floor),
        )
    }

    // == Latency Benchmark ==
    /// Issues batches of `process` calls over a fixed rotation of request
    /// kinds until the deadline, then reports the mean response time
    /// against the configured ceiling.
    pub async fn run_latency_benchmark(&self, duration: Duration) -> BenchmarkReport {
        info!("Latency benchmark starting for {:.1}s", duration.as_secs_f64());

        let start = Instant::now();
        let mut operations: u64 = 0;
        let mut errors: u64 = 0;
        let mut total_response_time = 0.0f64;
        let mut sequence = 0u64;

        while start.elapsed() < duration {
            let batch: Vec<_> = (0..self.batch_size)
                .map(|i| {
                    let request = rotation_request(sequence + i as u64);
                    self.processor.process(request)
                })
                .collect();
            sequence += self.batch_size as u64;

            for outcome in join_all(batch).await {
                operations += 1;
                total_response_time += outcome.response_time;
                if outcome.source == ResponseSource::Error {
                    errors += 1;
                }
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        let avg_latency = if operations == 0 {
            0.0
        } else {
            total_response_time / operations as f64
        };
        let target_achieved = avg_latency < self.targets.latency_ceiling;

        info!(
            "Latency benchmark completed: {:.4}s avg response time (target_achieved={})",
            avg_latency, target_achieved
        );

        self.build_report(
            "latency",
            elapsed,
            operations,
            errors,
            avg_latency,
            target_achieved,
            latency_score(avg_latency, self.targets.latency_ceiling),
        )
    }

    // == Stress Test ==
    /// Drives combined store and process load each round with a short
    /// breather, then classifies stability from the observed error rate.
    pub async fn run_stress_test(&self, duration: Duration) -> BenchmarkReport {
        info!("Stress test starting for {:.1}s", duration.as_secs_f64());

        let start = Instant::now();
        let mut operations: u64 = 0;
        let mut errors: u64 = 0;
        let mut round = 0u64;

        while start.elapsed() < duration {
            let stores: Vec<(String, String)> = (0..STRESS_STORES_PER_ROUND)
                .map(|i| (format!("stress_key_{}", i), format!("stress_value_{}_{}", round, i)))
                .collect();
            let requests: Vec<_> = (0..STRESS_REQUESTS_PER_ROUND)
                .map(|i| {
                    ProcessRequest::new(format!("stress_{}_{}", round, i), RequestKind::Analysis)
                        .with_payload(json!({ "target": format!("stress_target_{}", i) }))
                })
                .collect();

            let (stored, outcomes) = tokio::join!(
                self.engine.batch_store(stores),
                join_all(requests.into_iter().map(|r| self.processor.process(r))),
            );

            operations += stored.len() as u64;
            errors += stored.iter().filter(|ok| !**ok).count() as u64;
            for outcome in outcomes {
                operations += 1;
                if outcome.source == ResponseSource::Error {
                    errors += 1;
                }
            }

            round += 1;
            tokio::time::sleep(STRESS_PAUSE).await;
        }

        let elapsed = start.elapsed().as_secs_f64();
        let error_rate = errors as f64 / elapsed;
        let target_achieved = error_rate <= self.targets.error_ceiling;

        info!(
            "Stress test completed: {:.4} errors/sec ({})",
            error_rate,
            stability_label(error_rate, self.targets.error_ceiling)
        );

        self.build_report(
            "stress",
            elapsed,
            operations,
            errors,
            self.processor.metrics().snapshot().avg_duration_secs,
            target_achieved,
            stability_score(error_rate, self.targets.error_ceiling),
        )
    }

    // == Full Suite ==
    /// Runs throughput and latency concurrently, then the stress test, and
    /// folds the three scores into a weighted overall grade.
    pub async fn run_full_suite(&self, duration: Duration) -> SuiteReport {
        let (throughput, latency) = tokio::join!(
            self.run_throughput_benchmark(duration),
            self.run_latency_benchmark(duration),
        );
        let stress = self.run_stress_test(duration).await;

        let score = overall_score(
            throughput_score(throughput.ops_per_second, self.targets.throughput_floor),
            latency_score(latency.avg_latency, self.targets.latency_ceiling),
            stability_score(stress.error_rate_per_second, self.targets.error_ceiling),
        );
        let all_targets_achieved =
            throughput.target_achieved && latency.target_achieved && stress.target_achieved;

        info!(
            "Benchmark suite completed: grade={}, overall_score={:.1}, all_targets_achieved={}",
            grade_for_score(score),
            score,
            all_targets_achieved
        );

        SuiteReport {
            throughput,
            latency,
            stress,
            overall_score: score,
            all_targets_achieved,
            grade: grade_for_score(score).to_string(),
        }
    }

    fn build_report(
        &self,
        name: &str,
        elapsed: f64,
        operations: u64,
        errors: u64,
        avg_latency: f64,
        target_achieved: bool,
        score: f64,
    ) -> BenchmarkReport {
        let error_rate = if elapsed > 0.0 { errors as f64 / elapsed } else { 0.0 };
        BenchmarkReport {
            name: name.to_string(),
            duration_actual: elapsed,
            operations_completed: operations,
            ops_per_second: if elapsed > 0.0 { operations as f64 / elapsed } else { 0.0 },
            avg_latency,
            total_errors: errors,
            error_rate_per_second: error_rate,
            target_achieved,
            stability: stability_label(error_rate, self.targets.error_ceiling).to_string(),
            grade: grade_for_score(score).to_string(),
            completed_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Fixed request rotation for the latency run: the four kinds cycle so the
/// response cache sees repeats after the first round.
fn rotation_request(sequence: u64) -> ProcessRequest {
    let id = format!("latency_{}", sequence);
    match sequence % 4 {
        0 => ProcessRequest::new(id, RequestKind::Introspection),
        1 => ProcessRequest::new(id, RequestKind::Decision)
            .with_payload(json!({"options": ["a", "b", "c"]})),
        2 => ProcessRequest::new(id, RequestKind::Analysis)
            .with_payload(json!({"target": "performance"})),
        _ => ProcessRequest::new(id, RequestKind::General),
    }
}
