//! Correlated results returned by the external workflow.
//!
//! The host feeds back `{ "operationId": "...", "error": bool, "payload": ... }`
//! on a later refresh. [`FlowReturn::parse`] is the boundary for that text.

use serde_json::{Map, Value};
use timeline_core::comment::is_truthy;

use crate::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowReturn {
    pub operation_id: String,
    pub error: bool,
    pub payload: Option<Value>,
}

/// What a successful result does to the displayed collection.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadOutcome {
    /// A full collection, adopted as-is.
    Replace(String),
    /// A `{ "value": [...] }` envelope; the inner array is adopted.
    ReplaceWithValue(String),
    /// The single confirmed record, to be placed ahead of the pre-post snapshot.
    Single(Value),
    /// Nothing decodable came back; the optimistic collection stays.
    KeepOptimistic,
}

impl PayloadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace(_) => "replace",
            Self::ReplaceWithValue(_) => "replace_with_value",
            Self::Single(_) => "single",
            Self::KeepOptimistic => "keep_optimistic",
        }
    }
}

impl FlowReturn {
    pub fn parse(text: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(text.trim())?;
        let Value::Object(map) = value else {
            return Err(EngineError::FlowReturnNotObject);
        };

        let operation_id = match map.get("operationId") {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        if operation_id.is_empty() {
            return Err(EngineError::MissingOperationId);
        }

        Ok(Self {
            operation_id,
            error: map.get("error").is_some_and(is_truthy),
            payload: map.get("payload").filter(|v| !v.is_null()).cloned(),
        })
    }

    pub fn classify_payload(&self) -> PayloadOutcome {
        match &self.payload {
            None => PayloadOutcome::KeepOptimistic,
            Some(array @ Value::Array(_)) => PayloadOutcome::Replace(array.to_string()),
            Some(Value::Object(map)) => classify_object(map.clone()),
            Some(Value::String(text)) => classify_text(text),
            Some(_) => PayloadOutcome::KeepOptimistic,
        }
    }
}

fn classify_text(text: &str) -> PayloadOutcome {
    let trimmed = text.trim();
    if trimmed.starts_with('[') {
        // Adopted verbatim, but only once it is known to decode as an array.
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Array(_)) => PayloadOutcome::Replace(trimmed.to_string()),
            _ => {
                tracing::debug!(len = trimmed.len(), "array-shaped payload did not decode, keeping optimistic");
                PayloadOutcome::KeepOptimistic
            }
        };
    }
    if trimmed.starts_with('{') {
        return match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => classify_object(map),
            _ => {
                tracing::debug!(len = trimmed.len(), "object-shaped payload did not decode, keeping optimistic");
                PayloadOutcome::KeepOptimistic
            }
        };
    }
    PayloadOutcome::KeepOptimistic
}

fn classify_object(mut map: Map<String, Value>) -> PayloadOutcome {
    match map.remove("value") {
        Some(Value::Array(entries)) => PayloadOutcome::ReplaceWithValue(Value::Array(entries).to_string()),
        Some(other) => {
            map.insert("value".to_string(), other);
            PayloadOutcome::Single(Value::Object(map))
        }
        None => PayloadOutcome::Single(Value::Object(map)),
    }
}
