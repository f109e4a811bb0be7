// JSON document store port.
//
// Purpose
// - Read and write one flat JSON object as a whole. Used for the response
//   cache and the requirement store.
//
// Boundaries
// - No partial writes and no locking. Saving replaces the whole document and
//   the last writer wins.

pub mod file;
pub mod in_memory;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub type JsonDocument = Map<String, Value>;

#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed json document in {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait JsonStore: Send + Sync {
    /// Load the full document. A store that was never written yields an empty
    /// document.
    async fn load(&self) -> Result<JsonDocument, JsonStoreError>;

    /// Replace the full document.
    async fn save(&self, document: &JsonDocument) -> Result<(), JsonStoreError>;
}

/// Interpret raw file content as a document.
///
/// An empty JSON array is accepted as an empty document since older writers
/// encoded an empty mapping that way.
pub(crate) fn parse_document(path: &str, raw: &str) -> Result<JsonDocument, JsonStoreError> {
    if raw.trim().is_empty() {
        return Ok(JsonDocument::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Array(items)) if items.is_empty() => Ok(JsonDocument::new()),
        Ok(other) => Err(JsonStoreError::Malformed {
            path: path.to_string(),
            reason: format!("expected an object, found {}", kind_of(&other)),
        }),
        Err(e) => Err(JsonStoreError::Malformed {
            path: path.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
