//! Course document parsing and loading.
//!
//! Course documents are plain text files with a metadata header followed by
//! lesson sections:
//!
//! ```text
//! Course Title: Introduction to MCP
//! Course Link: https://example.com/mcp
//! Course Instructor: Ada Lovelace
//!
//! Lesson 0: Overview
//! Lesson Link: https://example.com/mcp/0
//! Lesson content...
//! ```

use crate::error::{KursError, Result};
use crate::vector_store::{ChunkMetadata, CourseCatalogEntry, CourseChunk, Lesson, VectorStore};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Maximum characters per content chunk.
const CHUNK_CHAR_LIMIT: usize = 800;

/// Parse a course document into a catalog entry and content chunks.
pub fn parse_course_document(content: &str) -> Result<(CourseCatalogEntry, Vec<CourseChunk>)> {
    let lesson_header =
        Regex::new(r"^Lesson\s+(\d+):\s*(.+)$").map_err(|e| KursError::Ingest(e.to_string()))?;

    let mut title: Option<String> = None;
    let mut course_link: Option<String> = None;
    let mut instructor: Option<String> = None;

    let mut lessons: Vec<Lesson> = Vec::new();
    let mut chunks: Vec<CourseChunk> = Vec::new();

    // Content being accumulated for the current section. Sections before
    // the first lesson header belong to the course itself.
    let mut current_lesson: Option<(u32, Option<String>)> = None;
    let mut section_text = String::new();

    let mut flush =
        |course_title: &str, lesson: &Option<(u32, Option<String>)>, text: &mut String, out: &mut Vec<CourseChunk>| {
            for piece in split_into_chunks(text.trim(), CHUNK_CHAR_LIMIT) {
                out.push(CourseChunk {
                    content: piece,
                    metadata: ChunkMetadata {
                        course_title: course_title.to_string(),
                        lesson_number: lesson.as_ref().map(|(n, _)| *n),
                        lesson_link: lesson.as_ref().and_then(|(_, link)| link.clone()),
                    },
                });
            }
            text.clear();
        };

    for line in content.lines() {
        let trimmed = line.trim();

        if let Some(value) = trimmed.strip_prefix("Course Title:") {
            title = Some(value.trim().to_string());
        } else if let Some(value) = trimmed.strip_prefix("Course Link:") {
            course_link = Some(value.trim().to_string());
        } else if let Some(value) = trimmed.strip_prefix("Course Instructor:") {
            instructor = Some(value.trim().to_string());
        } else if let Some(captures) = lesson_header.captures(trimmed) {
            let course_title = title
                .as_deref()
                .ok_or_else(|| KursError::Ingest("Missing 'Course Title:' header".to_string()))?;
            flush(course_title, &current_lesson, &mut section_text, &mut chunks);

            let number: u32 = captures[1]
                .parse()
                .map_err(|_| KursError::Ingest("Invalid lesson number".to_string()))?;
            let lesson_title = captures[2].trim().to_string();
            lessons.push(Lesson {
                lesson_number: Some(number),
                lesson_title: Some(lesson_title),
                lesson_link: None,
            });
            current_lesson = Some((number, None));
        } else if let Some(value) = trimmed.strip_prefix("Lesson Link:") {
            let link = value.trim().to_string();
            if let Some((_, lesson_link)) = current_lesson.as_mut() {
                *lesson_link = Some(link.clone());
            }
            if let Some(last) = lessons.last_mut() {
                last.lesson_link = Some(link);
            }
        } else {
            section_text.push_str(line);
            section_text.push('\n');
        }
    }

    let title = title.ok_or_else(|| KursError::Ingest("Missing 'Course Title:' header".to_string()))?;
    flush(&title, &current_lesson, &mut section_text, &mut chunks);

    let lessons_json = if lessons.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&lessons)?)
    };

    let entry = CourseCatalogEntry {
        title,
        course_link,
        instructor,
        lessons_json,
    };
    Ok((entry, chunks))
}

/// Pack paragraphs into chunks of at most `limit` characters.
///
/// An oversized paragraph becomes its own chunk; the packing never splits
/// inside a paragraph.
fn split_into_chunks(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        if !current.is_empty() && current.len() + paragraph.len() + 2 > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
        if current.len() > limit {
            chunks.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Load a single course document file into the store.
pub async fn add_course_file(store: &Arc<dyn VectorStore>, path: &Path) -> Result<usize> {
    let content = std::fs::read_to_string(path)?;
    let (entry, chunks) = parse_course_document(&content)?;
    let count = chunks.len();
    info!(course = %entry.title, chunks = count, "Adding course");
    store.add_course(entry, chunks).await?;
    Ok(count)
}

/// Load every `*.txt` course document in a folder.
///
/// Files that fail to parse are logged and skipped. Returns
/// (courses loaded, chunks added).
pub async fn load_course_folder(store: &Arc<dyn VectorStore>, path: &Path) -> Result<(usize, usize)> {
    let mut courses = 0;
    let mut chunks = 0;

    let mut files: Vec<_> = std::fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    files.sort();

    for file in files {
        match add_course_file(store, &file).await {
            Ok(count) => {
                courses += 1;
                chunks += count;
            }
            Err(e) => warn!(file = %file.display(), error = %e, "Skipping course document"),
        }
    }

    Ok((courses, chunks))
}
