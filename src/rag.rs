//! Top-level query coordination.
//!
//! Wires a query and optional session through the session manager, the
//! answer generator (with retrieval tools) and source extraction.

use crate::config::{Prompts, Settings};
use crate::engine::{ChatModel, GenerationConfig, OpenAiChatModel};
use crate::error::Result;
use crate::generator::AnswerGenerator;
use crate::ingest;
use crate::session::SessionManager;
use crate::tools::{CourseOutlineTool, CourseSearchTool, Source, ToolRegistry};
use crate::vector_store::{MemoryVectorStore, VectorStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// Catalog statistics for the courses endpoint.
#[derive(Debug, Clone)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

/// The course-materials question answering system.
pub struct RagSystem {
    vector_store: Arc<dyn VectorStore>,
    generator: AnswerGenerator,
    tool_registry: ToolRegistry,
    pub session_manager: SessionManager,
}

impl RagSystem {
    /// Assemble a system from its parts, registering the retrieval tools.
    pub fn new(
        model: Arc<dyn ChatModel>,
        vector_store: Arc<dyn VectorStore>,
        prompts: Prompts,
        config: GenerationConfig,
        max_history: usize,
    ) -> Result<Self> {
        let mut tool_registry = ToolRegistry::new();
        tool_registry.register(Arc::new(CourseSearchTool::new(vector_store.clone())))?;
        tool_registry.register(Arc::new(CourseOutlineTool::new(vector_store.clone())))?;

        Ok(Self {
            vector_store,
            generator: AnswerGenerator::with_config(model, prompts, config),
            tool_registry,
            session_manager: SessionManager::new(max_history),
        })
    }

    /// Build a system from settings: OpenAI chat model over an in-memory
    /// course index.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let model = Arc::new(OpenAiChatModel::new(&settings.generation.model));
        let store = Arc::new(MemoryVectorStore::new());
        let config = GenerationConfig {
            max_output_tokens: settings.generation.max_output_tokens,
            ..GenerationConfig::default()
        };
        Self::new(model, store, Prompts::default(), config, settings.session.max_history)
    }

    /// Load every course document in a folder into the index.
    pub async fn add_course_folder(&self, path: &Path) -> Result<(usize, usize)> {
        let (courses, chunks) = ingest::load_course_folder(&self.vector_store, path).await?;
        info!(courses, chunks, "Loaded course folder");
        Ok((courses, chunks))
    }

    /// Load a single course document into the index.
    pub async fn add_course_document(&self, path: &Path) -> Result<usize> {
        ingest::add_course_file(&self.vector_store, path).await
    }

    /// Answer a query, optionally within a session.
    ///
    /// Without a session id no history is consulted and no exchange is
    /// recorded; anonymous calls are deliberately stateless.
    #[instrument(skip(self), fields(query = %text))]
    pub async fn query(
        &self,
        text: &str,
        session_id: Option<&str>,
    ) -> Result<(String, Vec<Source>)> {
        let history = session_id.and_then(|id| self.session_manager.get_conversation_history(id));

        // Clear stale attribution before the tools run again.
        self.tool_registry.reset_sources();

        let answer = self
            .generator
            .generate(text, history.as_deref(), Some(&self.tool_registry))
            .await?;

        let sources = self.tool_registry.last_sources();

        if let Some(id) = session_id {
            self.session_manager.add_exchange(id, text, &answer);
        }

        Ok((answer, sources))
    }

    /// Course catalog statistics.
    pub async fn course_analytics(&self) -> Result<CourseAnalytics> {
        Ok(CourseAnalytics {
            total_courses: self.vector_store.course_count().await?,
            course_titles: self.vector_store.course_titles().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MockChatModel, ModelResponse, ToolCallRequest, TurnContent};
    use crate::vector_store::{ChunkMetadata, CourseCatalogEntry, CourseChunk};

    fn search_call(query: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: "c1".to_string(),
            name: "search_course_content".to_string(),
            arguments: serde_json::json!({ "query": query }),
        }
    }

    async fn seeded_system(mock: Arc<MockChatModel>) -> RagSystem {
        let store = Arc::new(MemoryVectorStore::new());
        store
            .add_course(
                CourseCatalogEntry {
                    title: "course1".to_string(),
                    course_link: None,
                    instructor: None,
                    lessons_json: None,
                },
                vec![CourseChunk {
                    content: "retrieval basics".to_string(),
                    metadata: ChunkMetadata {
                        course_title: "course1".to_string(),
                        lesson_number: Some(1),
                        lesson_link: Some("link1".to_string()),
                    },
                }],
            )
            .await
            .unwrap();
        RagSystem::new(mock, store, Prompts::default(), GenerationConfig::default(), 2).unwrap()
    }

    #[tokio::test]
    async fn test_query_without_session_is_stateless() {
        let mock = Arc::new(MockChatModel::new(vec![ModelResponse::text("answer")]));
        let rag = seeded_system(mock.clone()).await;

        let (answer, sources) = rag.query("test query", None).await.unwrap();

        assert_eq!(answer, "answer");
        assert!(sources.is_empty());
        // No history turn: system instruction then query.
        assert_eq!(mock.calls()[0].turns.len(), 2);
    }

    #[tokio::test]
    async fn test_query_with_session_records_exchange_and_injects_history() {
        let mock = Arc::new(MockChatModel::new(vec![
            ModelResponse::text("first answer"),
            ModelResponse::text("second answer"),
        ]));
        let rag = seeded_system(mock.clone()).await;
        let session = rag.session_manager.create_session();

        rag.query("first question", Some(&session)).await.unwrap();
        assert_eq!(rag.session_manager.exchange_count(&session), 1);

        rag.query("second question", Some(&session)).await.unwrap();
        assert_eq!(rag.session_manager.exchange_count(&session), 2);

        // The second call sees the first exchange as a history turn.
        let second = &mock.calls()[1].turns;
        assert_eq!(second.len(), 3);
        assert!(matches!(
            &second[0].content,
            TurnContent::Text(t) if t.contains("first question") && t.contains("first answer")
        ));
    }

    #[tokio::test]
    async fn test_query_surfaces_tool_sources() {
        let mock = Arc::new(MockChatModel::new(vec![
            ModelResponse::with_tool_calls(vec![search_call("retrieval basics")]),
            ModelResponse::text("answer with sources"),
        ]));
        let rag = seeded_system(mock).await;

        let (_, sources) = rag.query("what are retrieval basics?", None).await.unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, "course1 - Lesson 1");
        assert_eq!(sources[0].link.as_deref(), Some("link1"));
    }

    #[tokio::test]
    async fn test_sources_reset_between_queries() {
        let mock = Arc::new(MockChatModel::new(vec![
            ModelResponse::with_tool_calls(vec![search_call("retrieval basics")]),
            ModelResponse::text("with sources"),
            ModelResponse::text("no tools this time"),
        ]));
        let rag = seeded_system(mock).await;

        let (_, sources) = rag.query("first", None).await.unwrap();
        assert_eq!(sources.len(), 1);

        let (_, sources) = rag.query("second", None).await.unwrap();
        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn test_course_analytics() {
        let mock = Arc::new(MockChatModel::new(vec![]));
        let rag = seeded_system(mock).await;

        let analytics = rag.course_analytics().await.unwrap();
        assert_eq!(analytics.total_courses, 1);
        assert_eq!(analytics.course_titles, vec!["course1"]);
    }
}
