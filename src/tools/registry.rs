//! Tool definitions and the name-keyed registry
//!
//! The registry is owned by the embedding application and shared with the
//! client; the client only resolves names against it. Absence is an explicit
//! `None`, never an error: the dispatcher turns it into a placeholder
//! response.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Named arguments passed to a tool handler.
pub type ToolArgs = Map<String, Value>;

type Handler = Arc<dyn Fn(&ToolArgs) -> String + Send + Sync>;

/// An invocable tool: a name, a description for the remote agent, and a
/// synchronous handler.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    handler: Handler,
}

impl Tool {
    /// Create a new tool with the given handler.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl Fn(&ToolArgs) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Invoke the tool with named arguments, capturing its response.
    pub fn invoke(&self, args: &ToolArgs) -> String {
        (self.handler)(args)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Name-keyed collection of tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    /// Names of all registered tools, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_tool() -> Tool {
        Tool::new("echo", "Echo the text argument", |args| {
            args.get("text")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string()
        })
    }

    #[test]
    fn test_tool_invoke() {
        let tool = echo_tool();
        let mut args = ToolArgs::new();
        args.insert("text".to_string(), json!("hello"));

        assert_eq!(tool.invoke(&args), "hello");
    }

    #[test]
    fn test_tool_invoke_missing_argument() {
        let tool = echo_tool();
        assert_eq!(tool.invoke(&ToolArgs::new()), "");
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool());

        let tool = registry.get("echo").unwrap();
        assert_eq!(tool.name(), "echo");
        assert_eq!(tool.description(), "Echo the text argument");
    }

    #[test]
    fn test_registry_absent_tool_is_none() {
        let registry = ToolRegistry::new();
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.register(echo_tool());
        registry.register(Tool::new("echo", "Replacement", |_| "new".to_string()));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().description(), "Replacement");
    }

    #[test]
    fn test_registry_list_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(Tool::new("zulu", "", |_| String::new()));
        registry.register(Tool::new("alpha", "", |_| String::new()));

        assert_eq!(registry.list(), vec!["alpha", "zulu"]);
    }

    #[test]
    fn test_registry_empty() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_debug_hides_handler() {
        let debug = format!("{:?}", echo_tool());
        assert!(debug.contains("echo"));
        assert!(!debug.contains("handler"));
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ToolRegistry>();
    }
}
