//! Request Handlers
//!
//! The fixed handler set the processor routes to. Handlers are pure
//! functions of the request (plus the load snapshot they were dispatched
//! with) and never call back into a cache.

use serde_json::json;

use crate::error::{EngineError, Result};
use crate::models::{HandlerResponse, ProcessRequest, RequestKind};
use crate::processor::StateSnapshot;

/// Routes a request to its handler.
pub fn dispatch(request: &ProcessRequest, state: &StateSnapshot) -> Result<HandlerResponse> {
    match request.kind {
        RequestKind::Introspection => introspection(state),
        RequestKind::Decision => decision(request),
        RequestKind::Analysis => analysis(request),
        RequestKind::General => general(),
    }
}

/// Reports the engine's own load picture.
fn introspection(state: &StateSnapshot) -> Result<HandlerResponse> {
    Ok(HandlerResponse {
        success: true,
        kind: RequestKind::Introspection,
        data: json!({
            "load_level": state.load_level,
            "ready": state.ready,
            "status": "processing",
            "observations": [
                "load level within operating range",
                "response patterns consistent",
            ],
        }),
        processing_time: 0.02,
    })
}

/// Picks the first option from the payload's `options` list.
fn decision(request: &ProcessRequest) -> Result<HandlerResponse> {
    let options = match request.payload.get("options") {
        Some(value) => value
            .as_array()
            .ok_or_else(|| EngineError::Handler("options must be an array".to_string()))?
            .clone(),
        None => Vec::new(),
    };

    let selected = options
        .first()
        .and_then(|v| v.as_str())
        .unwrap_or("default")
        .to_string();

    Ok(HandlerResponse {
        success: true,
        kind: RequestKind::Decision,
        data: json!({
            "selected_option": selected,
            "confidence": 0.92,
            "alternatives_considered": options.len(),
        }),
        processing_time: 0.015,
    })
}

/// Summarizes a named analysis target.
fn analysis(request: &ProcessRequest) -> Result<HandlerResponse> {
    let target = match request.payload.get("target") {
        Some(value) => value
            .as_str()
            .ok_or_else(|| EngineError::Handler("target must be a string".to_string()))?
            .to_string(),
        None => "general".to_string(),
    };

    Ok(HandlerResponse {
        success: true,
        kind: RequestKind::Analysis,
        data: json!({
            "target": target,
            "findings": [
                "operation mix within expected bounds",
                "no anomalies in recent samples",
            ],
            "recommendations": [
                "keep current settings",
            ],
        }),
        processing_time: 0.025,
    })
}

fn general() -> Result<HandlerResponse> {
    Ok(HandlerResponse {
        success: true,
        kind: RequestKind::General,
        data: json!({
            "response": "general processing completed",
            "ready": true,
        }),
        processing_time: 0.01,
    })
}
