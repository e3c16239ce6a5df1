//! Request and Response models for the processing engine
//!
//! Defines the typed request envelope accepted by the `RequestProcessor`
//! and the structured outcomes it returns.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ProcessRequest, RequestKind};
pub use responses::{HandlerResponse, ProcessOutcome, ResponseSource};
