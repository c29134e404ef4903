//! In-memory vector store implementation.
//!
//! Scores chunks by lexical term overlap with the query. Useful for testing
//! and small corpora; a real deployment would swap in an embedding-backed
//! index behind the same trait.

use super::{ChunkMetadata, CourseCatalogEntry, CourseChunk, SearchResults, VectorStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Maximum number of chunks returned per search.
const MAX_RESULTS: usize = 5;

struct Inner {
    catalog: Vec<CourseCatalogEntry>,
    chunks: Vec<CourseChunk>,
}

/// In-memory course content index.
pub struct MemoryVectorStore {
    inner: RwLock<Inner>,
}

impl MemoryVectorStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                catalog: Vec::new(),
                chunks: Vec::new(),
            }),
        }
    }

    fn resolve_locked(inner: &Inner, course_name: &str) -> Option<String> {
        let needle = course_name.to_lowercase();

        // Exact title match first, then substring.
        if let Some(entry) = inner
            .catalog
            .iter()
            .find(|e| e.title.to_lowercase() == needle)
        {
            return Some(entry.title.clone());
        }
        inner
            .catalog
            .iter()
            .find(|e| e.title.to_lowercase().contains(&needle))
            .map(|e| e.title.clone())
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into lowercase alphanumeric terms.
fn terms(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fraction of query terms present in the chunk content.
fn overlap_score(query_terms: &[String], content: &str) -> f32 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let content_terms: HashMap<String, ()> =
        terms(content).into_iter().map(|t| (t, ())).collect();
    let hits = query_terms
        .iter()
        .filter(|t| content_terms.contains_key(*t))
        .count();
    hits as f32 / query_terms.len() as f32
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn add_course(&self, entry: CourseCatalogEntry, chunks: Vec<CourseChunk>) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        // Re-adding a course replaces its catalog entry and content.
        inner.catalog.retain(|e| e.title != entry.title);
        inner
            .chunks
            .retain(|c| c.metadata.course_title != entry.title);
        inner.catalog.push(entry);
        inner.chunks.extend(chunks);
        Ok(())
    }

    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults> {
        let inner = self.inner.read().unwrap();

        let course_filter = match course_name {
            Some(name) => match Self::resolve_locked(&inner, name) {
                Some(title) => Some(title),
                None => {
                    return Ok(SearchResults::empty(format!(
                        "No course found matching '{}'",
                        name
                    )))
                }
            },
            None => None,
        };

        let query_terms = terms(query);
        let mut scored: Vec<(f32, &CourseChunk)> = inner
            .chunks
            .iter()
            .filter(|c| {
                course_filter
                    .as_deref()
                    .is_none_or(|t| c.metadata.course_title == t)
            })
            .filter(|c| lesson_number.is_none_or(|n| c.metadata.lesson_number == Some(n)))
            .map(|c| (overlap_score(&query_terms, &c.content), c))
            .filter(|(score, _)| *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(MAX_RESULTS);

        if scored.is_empty() {
            return Ok(SearchResults::empty("No relevant content found"));
        }

        let mut results = SearchResults::default();
        for (score, chunk) in scored {
            results.documents.push(chunk.content.clone());
            results.metadata.push(ChunkMetadata {
                course_title: chunk.metadata.course_title.clone(),
                lesson_number: chunk.metadata.lesson_number,
                lesson_link: chunk.metadata.lesson_link.clone(),
            });
            results.distances.push(1.0 - score);
        }
        Ok(results)
    }

    async fn resolve_course_name(&self, course_name: &str) -> Result<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(Self::resolve_locked(&inner, course_name))
    }

    async fn get_catalog_entry(&self, title: &str) -> Result<Option<CourseCatalogEntry>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.catalog.iter().find(|e| e.title == title).cloned())
    }

    async fn course_count(&self) -> Result<usize> {
        let inner = self.inner.read().unwrap();
        Ok(inner.catalog.len())
    }

    async fn course_titles(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.catalog.iter().map(|e| e.title.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str, course: &str, lesson: Option<u32>) -> CourseChunk {
        CourseChunk {
            content: content.to_string(),
            metadata: ChunkMetadata {
                course_title: course.to_string(),
                lesson_number: lesson,
                lesson_link: lesson.map(|n| format!("https://example.com/{}/{}", course, n)),
            },
        }
    }

    fn entry(title: &str) -> CourseCatalogEntry {
        CourseCatalogEntry {
            title: title.to_string(),
            course_link: Some(format!("https://example.com/{}", title)),
            instructor: None,
            lessons_json: None,
        }
    }

    async fn seeded_store() -> MemoryVectorStore {
        let store = MemoryVectorStore::new();
        store
            .add_course(
                entry("Introduction to MCP"),
                vec![
                    chunk("MCP servers expose tools to clients", "Introduction to MCP", Some(1)),
                    chunk("Prompt templates and resources", "Introduction to MCP", Some(2)),
                ],
            )
            .await
            .unwrap();
        store
            .add_course(
                entry("Advanced Retrieval"),
                vec![chunk(
                    "Reranking improves retrieval quality",
                    "Advanced Retrieval",
                    Some(1),
                )],
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_search_scores_by_term_overlap() {
        let store = seeded_store().await;
        let results = store.search("MCP servers tools", None, None).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results.documents[0], "MCP servers expose tools to clients");
        assert_eq!(results.metadata[0].course_title, "Introduction to MCP");
        assert!(results.distances[0] < 1.0);
    }

    #[tokio::test]
    async fn test_search_with_course_and_lesson_filter() {
        let store = seeded_store().await;
        let results = store
            .search("templates", Some("mcp"), Some(2))
            .await
            .unwrap();
        assert_eq!(results.documents.len(), 1);
        assert_eq!(results.metadata[0].lesson_number, Some(2));
    }

    #[tokio::test]
    async fn test_search_unresolved_course_is_empty_with_reason() {
        let store = seeded_store().await;
        let results = store.search("anything", Some("biology"), None).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(
            results.error.as_deref(),
            Some("No course found matching 'biology'")
        );
    }

    #[tokio::test]
    async fn test_search_no_matches_is_empty_with_reason() {
        let store = seeded_store().await;
        let results = store.search("quantum chromodynamics", None, None).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(results.error.as_deref(), Some("No relevant content found"));
    }

    #[tokio::test]
    async fn test_resolve_course_name_fuzzy() {
        let store = seeded_store().await;
        assert_eq!(
            store.resolve_course_name("introduction to mcp").await.unwrap(),
            Some("Introduction to MCP".to_string())
        );
        assert_eq!(
            store.resolve_course_name("Retrieval").await.unwrap(),
            Some("Advanced Retrieval".to_string())
        );
        assert_eq!(store.resolve_course_name("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_catalog_analytics() {
        let store = seeded_store().await;
        assert_eq!(store.course_count().await.unwrap(), 2);
        let titles = store.course_titles().await.unwrap();
        assert!(titles.contains(&"Introduction to MCP".to_string()));
        assert!(titles.contains(&"Advanced Retrieval".to_string()));
    }
}
