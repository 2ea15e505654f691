//! JSON codec for the persisted log.
//!
//! The blob is a JSON array of entry objects, oldest first:
//!
//! ```text
//! [{"id":1,"time":"2024-05-01T12:30:00.000Z","a":2.0,"b":3.0,"op":"1","symbol":"+","result":5.0}]
//! ```
//!
//! Decoding is all-or-nothing: any structural problem rejects the whole blob.

use std::collections::HashSet;

use serde_json::Value;
use tally_types::LogEntry;

/// Why a stored blob was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("not valid JSON: {0}")]
    Syntax(String),

    #[error("expected an array of entries, found {0}")]
    NotAnArray(&'static str),

    #[error("entry at index {index} is malformed: {reason}")]
    MalformedEntry { index: usize, reason: String },

    #[error("entry id {0} appears more than once")]
    DuplicateId(u64),
}

pub fn encode(entries: &[LogEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string(entries)
}

pub fn decode(blob: &str) -> Result<Vec<LogEntry>, DecodeError> {
    let value: Value =
        serde_json::from_str(blob).map_err(|e| DecodeError::Syntax(e.to_string()))?;

    let items = match value {
        Value::Array(items) => items,
        other => return Err(DecodeError::NotAnArray(kind_of(&other))),
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let entry: LogEntry = serde_json::from_value(item).map_err(|e| {
            DecodeError::MalformedEntry {
                index,
                reason: e.to_string(),
            }
        })?;
        if !seen.insert(entry.id()) {
            return Err(DecodeError::DuplicateId(entry.id().get()));
        }
        entries.push(entry);
    }
    Ok(entries)
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
