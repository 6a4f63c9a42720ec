//! Wire shapes accepted for a comment collection.
//!
//! The host hands over either a bare array of comment objects or an object
//! carrying that array under `value`. [`parse`] is the only place text is turned
//! into a shape; callers decide what a failure means for them.

use serde_json::Value;

use crate::CoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum WireShape {
    /// `[ {...}, {...} ]`
    Bare(Vec<Value>),
    /// `{ "value": [ {...}, {...} ] }`
    Wrapped(Vec<Value>),
}

impl WireShape {
    pub fn entries(&self) -> &[Value] {
        match self {
            Self::Bare(entries) | Self::Wrapped(entries) => entries,
        }
    }

    pub fn into_entries(self) -> Vec<Value> {
        match self {
            Self::Bare(entries) | Self::Wrapped(entries) => entries,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bare(_) => "bare",
            Self::Wrapped(_) => "wrapped",
        }
    }
}

/// Parse host text into one of the accepted collection shapes.
pub fn parse(text: &str) -> Result<WireShape, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyInput);
    }
    let value: Value = serde_json::from_str(trimmed)?;
    classify(value)
}

/// Classify an already-decoded value.
pub fn classify(value: Value) -> Result<WireShape, CoreError> {
    match value {
        Value::Array(entries) => Ok(WireShape::Bare(entries)),
        Value::Object(mut map) => match map.remove("value") {
            Some(Value::Array(entries)) => Ok(WireShape::Wrapped(entries)),
            _ => Err(CoreError::UnrecognizedShape("object without a `value` array")),
        },
        other => Err(CoreError::UnrecognizedShape(json_kind(&other))),
    }
}

/// Entries of a collection, with the degrade-to-empty policy applied.
///
/// Unreadable text is logged and treated as an empty collection.
pub fn entries_or_empty(text: &str) -> Vec<Value> {
    match parse(text) {
        Ok(shape) => shape.into_entries(),
        Err(CoreError::EmptyInput) => Vec::new(),
        Err(e) => {
            tracing::debug!(error = %e, len = text.len(), "comment collection unreadable, using empty");
            Vec::new()
        }
    }
}

/// Serialize entries in the canonical (bare array) wire shape.
pub fn to_canonical_text(entries: &[Value]) -> String {
    Value::Array(entries.to_vec()).to_string()
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
