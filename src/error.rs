//! Error types for the engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Engine Error Enum ==
/// Unified error type for the cache and request-processing engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Key failed validation (empty or too long)
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Request failed validation before any processing
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A request handler reported a failure
    #[error("Handler failed: {0}")]
    Handler(String),

    /// The worker pool has been shut down and accepts no more work
    #[error("Executor is closed")]
    ExecutorClosed,

    /// A unit of work panicked; the panic was contained at the worker boundary
    #[error("Worker panicked while running a job")]
    WorkerPanicked,

    /// Internal engine error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
