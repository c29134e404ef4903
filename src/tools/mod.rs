//! Retrieval tools callable by the reasoning engine.
//!
//! A `Tool` advertises a machine-readable declaration and executes with
//! JSON arguments, always producing text. Tools that surface UI attribution
//! additionally implement `SourceProvider`; the registry queries that
//! capability explicitly instead of probing attributes.

mod outline;
mod registry;
mod search;

pub use outline::CourseOutlineTool;
pub use registry::ToolRegistry;
pub use search::CourseSearchTool;

use crate::engine::ToolDefinition;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribution record for one piece of retrieved content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Display text (course title, optionally with a lesson label).
    pub source: String,
    /// Link to the lesson, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A named, schema-described capability the engine can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declaration advertised to the reasoning engine.
    fn definition(&self) -> ToolDefinition;

    /// Execute with the supplied JSON arguments, returning text output.
    ///
    /// Domain-level "not found" conditions are returned as descriptive text;
    /// only unexpected failures surface as errors.
    async fn execute(&self, args: Value) -> Result<String>;

    /// Optional source-attribution capability.
    fn as_source_provider(&self) -> Option<&dyn SourceProvider> {
        None
    }
}

/// Capability for tools that retain sources from their last execution.
pub trait SourceProvider: Send + Sync {
    /// Sources recorded by the most recent execution.
    fn last_sources(&self) -> Vec<Source>;

    /// Clear retained sources.
    fn reset_sources(&self);
}
