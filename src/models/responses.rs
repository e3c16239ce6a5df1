//! Response DTOs for the processing engine
//!
//! Defines the structured results returned by handlers and the outcome
//! envelope handed back to callers.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::RequestKind;
use crate::processor::StateSnapshot;

/// Where an outcome's response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    /// Served from the response cache without re-processing
    Cache,
    /// Produced by a handler on this call
    Processed,
    /// Validation or handler failure; never cached
    Error,
}

/// Structured result produced by a handler (or synthesized for a failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerResponse {
    /// Whether the handler completed successfully
    pub success: bool,
    /// The request kind that produced this response
    pub kind: RequestKind,
    /// Handler-specific result body
    pub data: serde_json::Value,
    /// Nominal handler processing time in seconds
    pub processing_time: f64,
}

impl HandlerResponse {
    /// Creates a failure response carrying the error message.
    pub fn failure(kind: RequestKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            kind,
            data: json!({ "error": message.into() }),
            processing_time: 0.0,
        }
    }
}

/// The envelope returned by every `process` call.
///
/// Immutable once returned; errors are represented as a failure response
/// with `source = error` rather than propagated.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    /// Identifier echoed from the request
    pub request_id: String,
    /// The handler response (cached, fresh, or a failure body)
    pub response: HandlerResponse,
    /// Wall-clock seconds spent serving this call
    pub response_time: f64,
    /// Which path produced the response
    pub source: ResponseSource,
    /// Load state observed by this call
    pub state: StateSnapshot,
}
