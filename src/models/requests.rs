//! Request DTOs for the processing engine
//!
//! Defines the typed request envelope and its canonical fingerprint.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The request categories the processor routes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Introspection,
    Decision,
    Analysis,
    General,
}

impl Default for RequestKind {
    fn default() -> Self {
        RequestKind::General
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestKind::Introspection => "introspection",
            RequestKind::Decision => "decision",
            RequestKind::Analysis => "analysis",
            RequestKind::General => "general",
        };
        f.write_str(label)
    }
}

/// A request submitted to the processor.
///
/// # Fields
/// - `id`: caller-chosen identifier echoed back in the outcome
/// - `kind`: routing category, defaults to `general`
/// - `payload`: arbitrary JSON body interpreted by the handler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Request identifier
    pub id: String,
    /// Routing category
    #[serde(default)]
    pub kind: RequestKind,
    /// Handler-specific body
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ProcessRequest {
    /// Creates a request with an empty payload.
    pub fn new(id: impl Into<String>, kind: RequestKind) -> Self {
        Self {
            id: id.into(),
            kind,
            payload: serde_json::Value::Null,
        }
    }

    /// Attaches a payload body.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Validates the request envelope.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.id.is_empty() {
            return Some("Request id cannot be empty".to_string());
        }
        if self.id.len() > 256 {
            return Some("Request id exceeds maximum length of 256 characters".to_string());
        }
        None
    }

    /// Computes the request's canonical fingerprint.
    ///
    /// Identity fields are the kind and the payload; the id is an envelope
    /// field and does not participate, so retries of the same body coalesce.
    /// serde_json keeps object keys sorted, which makes the serialization
    /// stable under payload key reordering.
    pub fn canonical_hash(&self) -> String {
        let payload = serde_json::to_string(&self.payload).unwrap_or_default();
        let canonical = format!("{}|{}", self.kind, payload);

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_deserialize() {
        let json = r#"{"id": "req-1", "kind": "decision", "payload": {"options": ["a"]}}"#;
        let req: ProcessRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "req-1");
        assert_eq!(req.kind, RequestKind::Decision);
        assert_eq!(req.payload["options"][0], "a");
    }

    #[test]
    fn test_request_kind_defaults_to_general() {
        let json = r#"{"id": "req-2"}"#;
        let req: ProcessRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.kind, RequestKind::General);
        assert!(req.payload.is_null());
    }

    #[test]
    fn test_validate_empty_id() {
        let req = ProcessRequest::new("", RequestKind::General);
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = ProcessRequest::new("req-3", RequestKind::Analysis);
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_canonical_hash_ignores_payload_key_order() {
        let a: serde_json::Value =
            serde_json::from_str(r#"{"target": "engine", "depth": 3}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"depth": 3, "target": "engine"}"#).unwrap();

        let req_a = ProcessRequest::new("first", RequestKind::Analysis).with_payload(a);
        let req_b = ProcessRequest::new("second", RequestKind::Analysis).with_payload(b);

        assert_eq!(req_a.canonical_hash(), req_b.canonical_hash());
    }

    #[test]
    fn test_canonical_hash_ignores_id() {
        let req_a = ProcessRequest::new("id-1", RequestKind::General)
            .with_payload(json!({"n": 1}));
        let req_b = ProcessRequest::new("id-2", RequestKind::General)
            .with_payload(json!({"n": 1}));

        assert_eq!(req_a.canonical_hash(), req_b.canonical_hash());
    }

    #[test]
    fn test_canonical_hash_distinguishes_kind_and_payload() {
        let base = ProcessRequest::new("id", RequestKind::General).with_payload(json!({"n": 1}));
        let other_kind =
            ProcessRequest::new("id", RequestKind::Decision).with_payload(json!({"n": 1}));
        let other_payload =
            ProcessRequest::new("id", RequestKind::General).with_payload(json!({"n": 2}));

        assert_ne!(base.canonical_hash(), other_kind.canonical_hash());
        assert_ne!(base.canonical_hash(), other_payload.canonical_hash());
    }

    #[test]
    fn test_canonical_hash_is_hex_sha256() {
        let req = ProcessRequest::new("id", RequestKind::General);
        let hash = req.canonical_hash();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
