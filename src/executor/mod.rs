//! Concurrent Executor Module
//!
//! A fixed-size pool of worker tasks draining a bounded submission queue.
//! The pool is the engine's parallelism boundary: cache operations, handler
//! dispatch, and benchmark load all run as jobs on these workers.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{EngineError, Result};

type JobOutput = Result<Box<dyn Any + Send>>;

/// One queued unit of work plus the channel its result is delivered on.
struct Job {
    work: BoxFuture<'static, JobOutput>,
    reply: oneshot::Sender<JobOutput>,
}

// == Concurrent Executor ==
/// Fixed-size worker pool with a bounded submission queue.
///
/// Submission policy is **blocking backpressure**: when the queue is full,
/// `submit` waits for a slot instead of rejecting or dropping the job. Every
/// accepted job runs exactly once; there is no ordering guarantee across
/// jobs submitted concurrently by different callers. Individual jobs carry
/// no timeout - the only deadline discipline in the engine belongs to the
/// benchmark loops.
#[derive(Debug)]
pub struct ConcurrentExecutor {
    tx: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl ConcurrentExecutor {
    // == Constructor ==
    /// Creates a pool of `workers` tasks sharing one queue bounded at
    /// `queue_capacity`. Both are clamped to at least 1.
    pub fn new(workers: usize, queue_capacity: usize) -> Self {
        let worker_count = workers.max(1);
        let (tx, rx) = mpsc::channel::<Job>(queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let workers = (0..worker_count)
            .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&rx))))
            .collect();

        debug!(workers = worker_count, "executor pool started");
        Self { tx, workers }
    }

    // == Submit ==
    /// Enqueues a unit of work and awaits its result.
    ///
    /// Blocks (asynchronously) while the queue is full. A panic inside the
    /// job is contained at the worker boundary and surfaced as
    /// `EngineError::WorkerPanicked` for this call only.
    pub async fn submit<F, R>(&self, work: F) -> Result<R>
    where
        F: Future<Output = Result<R>> + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job = Job {
            work: async move {
                work.await
                    .map(|value| Box::new(value) as Box<dyn Any + Send>)
            }
            .boxed(),
            reply: reply_tx,
        };

        self.tx
            .send(job)
            .await
            .map_err(|_| EngineError::ExecutorClosed)?;

        let output = reply_rx.await.map_err(|_| EngineError::ExecutorClosed)??;
        output
            .downcast::<R>()
            .map(|boxed| *boxed)
            .map_err(|_| EngineError::Internal("job produced a mismatched result type".to_string()))
    }

    // == Worker Count ==
    /// Returns the number of workers in the pool.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    // == Shutdown ==
    /// Closes the queue and waits for all workers to drain and exit.
    ///
    /// Jobs already accepted still run to completion.
    pub async fn shutdown(self) {
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.await;
        }
        debug!("executor pool shut down");
    }
}

// == Worker Loop ==
/// Drains the shared queue until it closes.
///
/// Workers take the receiver lock only to pick up a job; execution happens
/// outside the lock, so up to `worker_count` jobs run in parallel.
async fn worker_loop(id: usize, rx: Arc<Mutex<mpsc::Receiver<Job>>>) {
    loop {
        let job = {
            let mut guard = rx.lock().await;
            guard.recv().await
        };
        let Some(job) = job else {
            debug!(worker = id, "worker exiting");
            break;
        };

        let result = AssertUnwindSafe(job.work).catch_unwind().await.unwrap_or_else(|_| {
            warn!(worker = id, "job panicked; worker continues");
            Err(EngineError::WorkerPanicked)
        });

        // The submitter may have been dropped; nothing to do then.
        let _ = job.reply.send(result);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_submit_returns_job_result() {
        let executor = ConcurrentExecutor::new(2, 16);

        let result = executor.submit(async { Ok(21 * 2) }).await.unwrap();
        assert_eq!(result, 42);

        executor.shutdown().await;
    }

    #[tokio::test]
    async fn test_each_job_runs_exactly_once() {
        let executor = ConcurrentExecutor::new(4, 16);
        let counter = Arc::new(AtomicU64::new(0));

        let jobs: Vec<_> = (0..100)
            .map(|_| {
                let counter = Arc::clone(&counter);
                executor.submit(async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            })
            .collect();
        let results = futures::future::join_all(jobs).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(counter.load(Ordering::SeqCst), 100);

        executor.shutdown().await;
    }

    #[tokio::test]
    async fn test_panic_is_contained_and_pool_survives() {
        let executor = ConcurrentExecutor::new(1, 4);

        let result: Result<()> = executor
            .submit(async { panic!("deliberate test panic") })
            .await;
        assert!(matches!(result, Err(EngineError::WorkerPanicked)));

        // Same (single) worker keeps serving jobs afterwards
        let ok = executor.submit(async { Ok("still alive") }).await.unwrap();
        assert_eq!(ok, "still alive");

        executor.shutdown().await;
    }

    #[tokio::test]
    async fn test_full_queue_blocks_then_completes() {
        let executor = Arc::new(ConcurrentExecutor::new(1, 1));

        // Saturate the single worker and the single queue slot, then pile
        // more submissions on top; every one must still complete.
        let jobs: Vec<_> = (0..8u64)
            .map(|i| {
                let executor = Arc::clone(&executor);
                tokio::spawn(async move {
                    executor
                        .submit(async move {
                            tokio::time::sleep(Duration::from_millis(5)).await;
                            Ok(i)
                        })
                        .await
                })
            })
            .collect();

        let mut seen: Vec<u64> = Vec::new();
        for job in jobs {
            seen.push(job.await.unwrap().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_worker_count() {
        let executor = ConcurrentExecutor::new(8, 16);
        assert_eq!(executor.worker_count(), 8);
        executor.shutdown().await;
    }

    #[tokio::test]
    async fn test_zero_workers_clamped() {
        let executor = ConcurrentExecutor::new(0, 0);
        assert_eq!(executor.worker_count(), 1);

        let result = executor.submit(async { Ok(1) }).await.unwrap();
        assert_eq!(result, 1);

        executor.shutdown().await;
    }

    #[test]
    fn test_error_result_passes_through() {
        // Sync-context harness for a quick error-path check
        tokio_test::block_on(async {
            let executor = ConcurrentExecutor::new(1, 4);
            let result: Result<u8> = executor
                .submit(async { Err(EngineError::Handler("boom".to_string())) })
                .await;
            assert!(matches!(result, Err(EngineError::Handler(_))));
            executor.shutdown().await;
        });
    }
}
