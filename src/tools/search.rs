//! Course content search tool.

use super::{Source, SourceProvider, Tool};
use crate::engine::ToolDefinition;
use crate::error::{KursError, Result};
use crate::vector_store::{SearchResults, VectorStore};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Searches course content with fuzzy course name matching and lesson
/// filtering, and retains per-result sources for UI attribution.
pub struct CourseSearchTool {
    store: Arc<dyn VectorStore>,
    last_sources: Mutex<Vec<Source>>,
}

impl CourseSearchTool {
    /// Create a new search tool over the given store.
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self {
            store,
            last_sources: Mutex::new(Vec::new()),
        }
    }

    /// Format search results with course and lesson context.
    ///
    /// Overwrites the retained source list as a side effect.
    fn format_results(&self, results: &SearchResults) -> String {
        let mut formatted = Vec::new();
        let mut sources = Vec::new();

        for (doc, meta) in results.documents.iter().zip(results.metadata.iter()) {
            let mut label = meta.course_title.clone();
            if let Some(lesson) = meta.lesson_number {
                label.push_str(&format!(" - Lesson {}", lesson));
            }

            sources.push(Source {
                source: label.clone(),
                link: meta.lesson_link.clone(),
            });
            formatted.push(format!("[{}]\n{}", label, doc));
        }

        *self.last_sources.lock().unwrap() = sources;

        formatted.join("\n\n")
    }
}

#[async_trait]
impl Tool for CourseSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_course_content".to_string(),
            description: "Search course materials with smart course name matching and lesson filtering".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| KursError::InvalidInput("Missing 'query' argument".to_string()))?;
        let course_name = args["course_name"].as_str();
        let lesson_number = args["lesson_number"].as_u64().map(|n| n as u32);

        info!(query, course_name, lesson_number, "Searching course content");

        let results = self.store.search(query, course_name, lesson_number).await?;
        Ok(self.format_results(&results))
    }

    fn as_source_provider(&self) -> Option<&dyn SourceProvider> {
        Some(self)
    }
}

impl SourceProvider for CourseSearchTool {
    fn last_sources(&self) -> Vec<Source> {
        self.last_sources.lock().unwrap().clone()
    }

    fn reset_sources(&self) {
        self.last_sources.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::{ChunkMetadata, CourseCatalogEntry, CourseChunk};

    /// Stub store that returns a canned result and records search arguments.
    struct StubStore {
        results: SearchResults,
        seen: Mutex<Vec<(String, Option<String>, Option<u32>)>>,
    }

    impl StubStore {
        fn returning(results: SearchResults) -> Self {
            Self {
                results,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorStore for StubStore {
        async fn add_course(
            &self,
            _entry: CourseCatalogEntry,
            _chunks: Vec<CourseChunk>,
        ) -> Result<()> {
            Ok(())
        }

        async fn search(
            &self,
            query: &str,
            course_name: Option<&str>,
            lesson_number: Option<u32>,
        ) -> Result<SearchResults> {
            self.seen.lock().unwrap().push((
                query.to_string(),
                course_name.map(str::to_string),
                lesson_number,
            ));
            Ok(self.results.clone())
        }

        async fn resolve_course_name(&self, _course_name: &str) -> Result<Option<String>> {
            Ok(None)
        }

        async fn get_catalog_entry(&self, _title: &str) -> Result<Option<CourseCatalogEntry>> {
            Ok(None)
        }

        async fn course_count(&self) -> Result<usize> {
            Ok(0)
        }

        async fn course_titles(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    fn two_lesson_results() -> SearchResults {
        SearchResults {
            documents: vec!["doc1".to_string(), "doc2".to_string()],
            metadata: vec![
                ChunkMetadata {
                    course_title: "course1".to_string(),
                    lesson_number: Some(1),
                    lesson_link: Some("link1".to_string()),
                },
                ChunkMetadata {
                    course_title: "course2".to_string(),
                    lesson_number: Some(2),
                    lesson_link: Some("link2".to_string()),
                },
            ],
            distances: vec![0.1, 0.2],
            error: None,
        }
    }

    #[tokio::test]
    async fn test_format_results_and_sources() {
        let store = Arc::new(StubStore::returning(two_lesson_results()));
        let tool = CourseSearchTool::new(store);

        let output = tool
            .execute(serde_json::json!({"query": "test query"}))
            .await
            .unwrap();

        assert_eq!(output, "[course1 - Lesson 1]\ndoc1\n\n[course2 - Lesson 2]\ndoc2");
        assert_eq!(
            tool.last_sources(),
            vec![
                Source {
                    source: "course1 - Lesson 1".to_string(),
                    link: Some("link1".to_string()),
                },
                Source {
                    source: "course2 - Lesson 2".to_string(),
                    link: Some("link2".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_header_without_lesson_number() {
        let results = SearchResults {
            documents: vec!["doc1".to_string()],
            metadata: vec![ChunkMetadata {
                course_title: "course1".to_string(),
                lesson_number: None,
                lesson_link: None,
            }],
            distances: vec![0.1],
            error: None,
        };
        let tool = CourseSearchTool::new(Arc::new(StubStore::returning(results)));

        let output = tool
            .execute(serde_json::json!({"query": "q"}))
            .await
            .unwrap();

        assert_eq!(output, "[course1]\ndoc1");
        assert_eq!(tool.last_sources()[0].source, "course1");
        assert_eq!(tool.last_sources()[0].link, None);
    }

    #[tokio::test]
    async fn test_passes_filters_through() {
        let store = Arc::new(StubStore::returning(two_lesson_results()));
        let tool = CourseSearchTool::new(store.clone());

        tool.execute(serde_json::json!({
            "query": "test query",
            "course_name": "course1",
            "lesson_number": 1
        }))
        .await
        .unwrap();

        let seen = store.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            ("test query".to_string(), Some("course1".to_string()), Some(1))
        );
    }

    #[tokio::test]
    async fn test_empty_results_format_to_empty_string() {
        let store = Arc::new(StubStore::returning(SearchResults::empty("No results found")));
        let tool = CourseSearchTool::new(store);

        let output = tool
            .execute(serde_json::json!({"query": "nothing"}))
            .await
            .unwrap();

        assert_eq!(output, "");
        assert!(tool.last_sources().is_empty());
    }

    #[tokio::test]
    async fn test_missing_query_is_an_error() {
        let store = Arc::new(StubStore::returning(two_lesson_results()));
        let tool = CourseSearchTool::new(store);

        let result = tool.execute(serde_json::json!({})).await;
        assert!(matches!(result, Err(KursError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_new_execution_overwrites_sources() {
        let store = Arc::new(StubStore::returning(two_lesson_results()));
        let tool = CourseSearchTool::new(store);

        tool.execute(serde_json::json!({"query": "first"})).await.unwrap();
        assert_eq!(tool.last_sources().len(), 2);
        tool.execute(serde_json::json!({"query": "second"})).await.unwrap();
        assert_eq!(tool.last_sources().len(), 2);

        tool.reset_sources();
        assert!(tool.last_sources().is_empty());
    }
}
