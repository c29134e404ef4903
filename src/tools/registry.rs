//! Tool registry: declaration aggregation and dispatch by name.

use super::{Source, Tool};
use crate::engine::ToolDefinition;
use crate::error::{KursError, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Holds the set of registered tools.
///
/// Declarations are exposed in registration order. Dispatch to an unknown
/// name yields a textual result rather than an error so the engine's loop
/// stays alive; errors raised inside a tool's own execution propagate to
/// the caller.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<(String, Arc<dyn Tool>)>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under the name in its declaration.
    ///
    /// Re-registering a name replaces the previous tool. A declaration
    /// without a name is a configuration error.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let name = tool.definition().name;
        if name.is_empty() {
            return Err(KursError::Config(
                "Tool must have a name in its definition".to_string(),
            ));
        }
        self.tools.retain(|(existing, _)| *existing != name);
        self.tools.push((name, tool));
        Ok(())
    }

    /// All tool declarations, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|(_, tool)| tool.definition()).collect()
    }

    /// Execute a tool by name with the given arguments.
    pub async fn execute(&self, name: &str, args: Value) -> Result<String> {
        let Some((_, tool)) = self.tools.iter().find(|(n, _)| n == name) else {
            return Ok(format!("Tool '{}' not found", name));
        };
        info!(tool = name, "Executing tool");
        tool.execute(args).await
    }

    /// Sources from whichever tool most recently populated them.
    ///
    /// Single-slot by design: the first tool with non-empty sources wins,
    /// matching the at-most-one-search-per-query usage pattern.
    pub fn last_sources(&self) -> Vec<Source> {
        for (_, tool) in &self.tools {
            if let Some(provider) = tool.as_source_provider() {
                let sources = provider.last_sources();
                if !sources.is_empty() {
                    return sources;
                }
            }
        }
        Vec::new()
    }

    /// Clear every tool's retained sources.
    ///
    /// Must run before each new top-level query so attribution never leaks
    /// across queries.
    pub fn reset_sources(&self) {
        for (_, tool) in &self.tools {
            if let Some(provider) = tool.as_source_provider() {
                provider.reset_sources();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ToolDefinition;
    use crate::tools::SourceProvider;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticTool {
        name: &'static str,
        reply: &'static str,
        sources: Option<Mutex<Vec<Source>>>,
    }

    impl StaticTool {
        fn new(name: &'static str, reply: &'static str) -> Self {
            Self {
                name,
                reply,
                sources: None,
            }
        }

        fn with_sources(name: &'static str, reply: &'static str, sources: Vec<Source>) -> Self {
            Self {
                name,
                reply,
                sources: Some(Mutex::new(sources)),
            }
        }
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: self.name.to_string(),
                description: "test tool".to_string(),
                parameters: serde_json::json!({"type": "object", "properties": {}}),
            }
        }

        async fn execute(&self, _args: Value) -> Result<String> {
            Ok(self.reply.to_string())
        }

        fn as_source_provider(&self) -> Option<&dyn SourceProvider> {
            self.sources.as_ref().map(|_| self as &dyn SourceProvider)
        }
    }

    impl SourceProvider for StaticTool {
        fn last_sources(&self) -> Vec<Source> {
            self.sources
                .as_ref()
                .map(|s| s.lock().unwrap().clone())
                .unwrap_or_default()
        }

        fn reset_sources(&self) {
            if let Some(sources) = &self.sources {
                sources.lock().unwrap().clear();
            }
        }
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_returns_text() {
        let registry = ToolRegistry::new();
        let result = registry
            .execute("missing_tool", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(result, "Tool 'missing_tool' not found");
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(StaticTool::new("alpha", "from alpha")))
            .unwrap();
        registry
            .register(Arc::new(StaticTool::new("beta", "from beta")))
            .unwrap();

        let result = registry.execute("beta", serde_json::json!({})).await.unwrap();
        assert_eq!(result, "from beta");
    }

    #[test]
    fn test_definitions_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(StaticTool::new("alpha", "")))
            .unwrap();
        registry
            .register(Arc::new(StaticTool::new("beta", "")))
            .unwrap();

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_register_unnamed_tool_is_config_error() {
        let mut registry = ToolRegistry::new();
        let result = registry.register(Arc::new(StaticTool::new("", "")));
        assert!(matches!(result, Err(KursError::Config(_))));
    }

    #[test]
    fn test_last_sources_takes_first_non_empty() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(StaticTool::with_sources("empty", "", vec![])))
            .unwrap();
        let source = Source {
            source: "course1 - Lesson 1".to_string(),
            link: Some("link1".to_string()),
        };
        registry
            .register(Arc::new(StaticTool::with_sources(
                "full",
                "",
                vec![source.clone()],
            )))
            .unwrap();

        assert_eq!(registry.last_sources(), vec![source]);
    }

    #[test]
    fn test_reset_sources_clears_all_providers() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(StaticTool::with_sources(
                "full",
                "",
                vec![Source {
                    source: "course1".to_string(),
                    link: None,
                }],
            )))
            .unwrap();

        registry.reset_sources();
        assert!(registry.last_sources().is_empty());
    }
}
