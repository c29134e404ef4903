//! Vector store abstraction for Kurs.
//!
//! Provides a trait-based interface over the course content index and the
//! course catalog. The persistent index backing a deployment is external to
//! this crate; the in-memory backend implements the same contract and doubles
//! as the test backend.

mod memory;

pub use memory::MemoryVectorStore;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata attached to one indexed content chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Exact title of the course this chunk belongs to.
    pub course_title: String,
    /// Lesson number within the course, if the chunk came from a lesson.
    pub lesson_number: Option<u32>,
    /// Link to the lesson, if known.
    pub lesson_link: Option<String>,
}

/// A chunk of course content stored in the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseChunk {
    /// Text content of this chunk.
    pub content: String,
    /// Metadata describing where the chunk came from.
    pub metadata: ChunkMetadata,
}

/// Catalog entry describing one course.
///
/// Lessons are kept as a JSON-encoded string, matching the catalog wire
/// format; callers that need structured lessons parse it themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCatalogEntry {
    /// Exact course title (unique catalog key).
    pub title: String,
    /// Link to the course page.
    pub course_link: Option<String>,
    /// Course instructor.
    pub instructor: Option<String>,
    /// JSON-encoded list of lessons.
    pub lessons_json: Option<String>,
}

/// A lesson as encoded in `CourseCatalogEntry::lessons_json`.
///
/// All fields are optional so that partially-described lessons survive
/// deserialization; renderers skip lessons missing a number or title.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Lesson {
    pub lesson_number: Option<u32>,
    pub lesson_title: Option<String>,
    pub lesson_link: Option<String>,
}

/// Results of a content search.
///
/// `documents`, `metadata` and `distances` are parallel sequences. An empty
/// result may carry a human-readable reason in `error` (e.g. an unresolved
/// course filter).
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// Matched chunk texts, best match first.
    pub documents: Vec<String>,
    /// Metadata parallel to `documents`.
    pub metadata: Vec<ChunkMetadata>,
    /// Similarity distances parallel to `documents` (lower is closer).
    pub distances: Vec<f32>,
    /// Reason for an empty result, if any.
    pub error: Option<String>,
}

impl SearchResults {
    /// Create an empty result set carrying a reason.
    pub fn empty(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Default::default()
        }
    }

    /// True if no documents matched.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Trait for course content index implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Add a course to the catalog along with its content chunks.
    async fn add_course(&self, entry: CourseCatalogEntry, chunks: Vec<CourseChunk>) -> Result<()>;

    /// Search course content, optionally filtered by (fuzzy) course name
    /// and lesson number.
    async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults>;

    /// Resolve a fuzzy/partial course name to the exact catalog title.
    async fn resolve_course_name(&self, course_name: &str) -> Result<Option<String>>;

    /// Fetch the catalog entry for an exact course title.
    async fn get_catalog_entry(&self, title: &str) -> Result<Option<CourseCatalogEntry>>;

    /// Number of courses in the catalog.
    async fn course_count(&self) -> Result<usize>;

    /// Titles of all courses in the catalog.
    async fn course_titles(&self) -> Result<Vec<String>>;
}
