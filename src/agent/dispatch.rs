//! Tool call dispatch
//!
//! Resolves a named tool against the externally supplied registry, invokes it
//! synchronously, and records the outcome. Dispatch always succeeds at the
//! interface level: a missing tool produces a placeholder response and is
//! logged identically to a successful call.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::tools::ToolRegistry;

use super::log::{CallLog, ToolCallRecord, UNKNOWN_TOOL};

/// Tool-call descriptor as delivered by the remote service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Call id assigned by the service, when present
    #[serde(default)]
    pub id: Option<String>,
    /// The function to invoke
    #[serde(default)]
    pub function: FunctionCall,
}

/// Named function plus JSON-encoded arguments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: Option<String>,
    /// Arguments as a JSON string, as the API passes them
    #[serde(default)]
    pub arguments: Option<String>,
}

impl ToolCallRequest {
    /// Convenience constructor for callers building descriptors directly.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: None,
            function: FunctionCall {
                name: Some(name.into()),
                arguments: Some(arguments.into()),
            },
        }
    }
}

/// Placeholder response for a tool absent from the registry.
fn not_found_response(name: &str) -> String {
    format!("[tool '{}' not found]", name)
}

/// Execute one tool call and record the outcome.
///
/// Argument parsing is tolerant: an unparseable or absent argument string is
/// treated as an empty argument map, never a failure. Exactly one record is
/// appended per invocation, found or not.
pub(crate) fn dispatch(
    source: &str,
    registry: Option<&ToolRegistry>,
    log: &mut CallLog,
    call: &ToolCallRequest,
) -> String {
    let name = call.function.name.as_deref().unwrap_or(UNKNOWN_TOOL);

    let args: Map<String, Value> = call
        .function
        .arguments
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    let response = match registry.and_then(|r| r.get(name)) {
        Some(tool) => tool.invoke(&args),
        None => {
            log::warn!("tool '{}' not found in registry", name);
            not_found_response(name)
        }
    };

    log.append(ToolCallRecord {
        source: source.to_string(),
        destination: name.to_string(),
        arguments: Value::Object(args).to_string(),
        response: response.clone(),
    });

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn registry_with_lookup() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Tool::new("lookup", "Look something up", |args| {
            format!(
                "a={}, b={}",
                args.get("a").cloned().unwrap_or(Value::Null),
                args.get("b").cloned().unwrap_or(Value::Null)
            )
        }));
        registry
    }

    #[test]
    fn test_dispatch_forwards_named_arguments() {
        let registry = registry_with_lookup();
        let mut log = CallLog::new();

        let call = ToolCallRequest::new("lookup", r#"{"a":1,"b":"two"}"#);
        let response = dispatch("agent", Some(&registry), &mut log, &call);

        assert_eq!(response, "a=1, b=\"two\"");
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].destination, "lookup");
        assert_eq!(log.records()[0].response, "a=1, b=\"two\"");
    }

    #[test]
    fn test_dispatch_missing_tool_twice_appends_two_identical_records() {
        let registry = ToolRegistry::new();
        let mut log = CallLog::new();

        let call = ToolCallRequest::new("Xyz", "{}");
        let first = dispatch("agent", Some(&registry), &mut log, &call);
        let second = dispatch("agent", Some(&registry), &mut log, &call);

        assert_eq!(first, "[tool 'Xyz' not found]");
        assert_eq!(first, second);
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0].destination, "Xyz");
        assert_eq!(log.records()[1].destination, "Xyz");
        assert_eq!(log.records()[0].response, log.records()[1].response);
    }

    #[test]
    fn test_dispatch_without_registry_is_not_found() {
        let mut log = CallLog::new();

        let call = ToolCallRequest::new("lookup", "{}");
        let response = dispatch("agent", None, &mut log, &call);

        assert_eq!(response, "[tool 'lookup' not found]");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_dispatch_malformed_arguments_become_empty() {
        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let seen_in_tool = Arc::clone(&seen);

        let mut registry = ToolRegistry::new();
        registry.register(Tool::new("count", "Count received args", move |args| {
            seen_in_tool.store(args.len(), Ordering::SeqCst);
            "ok".to_string()
        }));
        let mut log = CallLog::new();

        let call = ToolCallRequest::new("count", "{not valid json");
        let response = dispatch("agent", Some(&registry), &mut log, &call);

        assert_eq!(response, "ok");
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(log.records()[0].arguments, "{}");
    }

    #[test]
    fn test_dispatch_absent_name_uses_unknown() {
        let mut log = CallLog::new();

        let call = ToolCallRequest::default();
        let response = dispatch("agent", None, &mut log, &call);

        assert_eq!(response, "[tool 'unknown' not found]");
        assert_eq!(log.records()[0].destination, "unknown");
    }

    #[test]
    fn test_dispatch_records_reserialized_arguments() {
        let registry = registry_with_lookup();
        let mut log = CallLog::new();

        let call = ToolCallRequest::new("lookup", r#"  {"a": 1}  "#);
        dispatch("agent", Some(&registry), &mut log, &call);

        assert_eq!(log.records()[0].arguments, "{\"a\":1}");
    }

    #[test]
    fn test_descriptor_deserializes_from_wire_shape() {
        let raw = r#"{"id": "call_7", "function": {"name": "lookup", "arguments": "{\"a\":1}"}}"#;
        let call: ToolCallRequest = serde_json::from_str(raw).unwrap();

        assert_eq!(call.id.as_deref(), Some("call_7"));
        assert_eq!(call.function.name.as_deref(), Some("lookup"));
        assert_eq!(call.function.arguments.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_descriptor_tolerates_missing_fields() {
        let call: ToolCallRequest = serde_json::from_str("{}").unwrap();
        assert!(call.id.is_none());
        assert!(call.function.name.is_none());
        assert!(call.function.arguments.is_none());
    }
}
