//! Per-turn tool-call log
//!
//! The call log is an ordered, append-only (until reset) buffer of structured
//! records describing every tool call a turn discovered or dispatched. It is
//! reset at the start of each streaming session and drained by the caller
//! between turns. Usage is strictly sequential within one turn; the `&mut`
//! borrows on the owning client enforce the single-writer contract.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Destination recorded when a tool-call entry carries no name.
pub const UNKNOWN_TOOL: &str = "unknown";

/// One tool invocation, as discovered in a response or dispatched locally.
///
/// Created once per call and never mutated afterwards. `arguments` holds the
/// JSON-encoded argument object as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Identity of the agent that observed or issued the call
    pub source: String,
    /// Name of the tool the call targets
    pub destination: String,
    /// JSON-encoded arguments
    pub arguments: String,
    /// Response produced by the tool, or empty when not yet executed
    pub response: String,
}

impl ToolCallRecord {
    /// Build a record from a raw `tool_calls` wire entry.
    ///
    /// The entry shape is `{"function": {"name": ..., "arguments": ...}}`,
    /// but every field is optional: a missing name records the unknown-tool
    /// destination, missing arguments record an empty object, and a missing
    /// response records an empty string.
    pub fn from_wire(source: &str, entry: &Value) -> Self {
        let function = entry.get("function");

        let destination = function
            .and_then(|f| f.get("name"))
            .and_then(Value::as_str)
            .or_else(|| entry.get("name").and_then(Value::as_str))
            .unwrap_or(UNKNOWN_TOOL)
            .to_string();

        let arguments = match function.and_then(|f| f.get("arguments")) {
            Some(Value::String(raw)) => raw.clone(),
            Some(other) => other.to_string(),
            None => "{}".to_string(),
        };

        let response = entry
            .get("response")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();

        Self {
            source: source.to_string(),
            destination,
            arguments,
            response,
        }
    }
}

/// Ordered buffer of tool-call records for one client instance.
#[derive(Debug, Default)]
pub struct CallLog {
    records: Vec<ToolCallRecord>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record. Records keep arrival order.
    pub fn append(&mut self, record: ToolCallRecord) {
        self.records.push(record);
    }

    /// Clear the log. Called at the start of each streaming session.
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// Take all records, leaving the log empty. This is the caller-facing
    /// "read and clear between turns" operation.
    pub fn drain(&mut self) -> Vec<ToolCallRecord> {
        std::mem::take(&mut self.records)
    }

    /// Records accumulated so far, in arrival order.
    pub fn records(&self) -> &[ToolCallRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
