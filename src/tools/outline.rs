//! Course outline tool.

use super::Tool;
use crate::engine::ToolDefinition;
use crate::error::{KursError, Result};
use crate::vector_store::{Lesson, VectorStore};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

/// Fetches the outline of a course: title, link and lesson list.
pub struct CourseOutlineTool {
    store: Arc<dyn VectorStore>,
}

impl CourseOutlineTool {
    /// Create a new outline tool over the given store.
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CourseOutlineTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_course_outline".to_string(),
            description: "Get the outline of a course, including title, link, and all lesson titles.".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "course_name": {
                        "type": "string",
                        "description": "The title of the course to get the outline for (e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_name"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let course_name = args["course_name"]
            .as_str()
            .ok_or_else(|| KursError::InvalidInput("Missing 'course_name' argument".to_string()))?;

        info!(course_name, "Fetching course outline");

        // Resolve the fuzzy name to the exact catalog title first.
        let Some(exact_title) = self.store.resolve_course_name(course_name).await? else {
            return Ok(format!("Could not find a course named '{}'.", course_name));
        };

        // Catalog failures stay inside the tool as text so one bad fetch
        // doesn't abort the whole generation.
        let entry = match self.store.get_catalog_entry(&exact_title).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                return Ok(format!(
                    "Could not retrieve metadata for course '{}'.",
                    exact_title
                ));
            }
            Err(e) => {
                error!(error = %e, "Error fetching course metadata");
                return Ok("An error occurred while fetching course details.".to_string());
            }
        };

        let course_link = entry.course_link.as_deref().unwrap_or("Unknown Link");

        let Some(lessons_json) = entry.lessons_json.as_deref() else {
            return Ok(format!("No lessons found for course '{}'.", entry.title));
        };

        let lessons: Vec<Lesson> = match serde_json::from_str(lessons_json) {
            Ok(lessons) => lessons,
            Err(_) => return Ok("Error parsing lesson data.".to_string()),
        };
        if lessons.is_empty() {
            return Ok(format!("No lessons listed for course '{}'.", entry.title));
        }

        let mut sorted = lessons;
        sorted.sort_by_key(|l| l.lesson_number.unwrap_or(0));

        let mut formatted = vec![
            format!("Course: {}", entry.title),
            format!("Link: {}", course_link),
            "Lessons:".to_string(),
        ];
        for lesson in &sorted {
            // Lessons missing a number or title are skipped.
            if let (Some(number), Some(title)) = (lesson.lesson_number, lesson.lesson_title.as_deref()) {
                formatted.push(format!("  - Lesson {}: {}", number, title));
            }
        }

        Ok(formatted.join("\n"))
    }
}
