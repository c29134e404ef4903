//! Course document ingestion.

use crate::cli::Output;
use crate::config::Settings;
use crate::rag::RagSystem;
use std::path::PathBuf;

/// Load course documents from a file or folder and report what was added.
pub async fn run_ingest(path: Option<&str>, settings: Settings) -> anyhow::Result<()> {
    let target: PathBuf = match path {
        Some(p) => Settings::expand_path(p),
        None => settings.docs_dir(),
    };

    let rag = RagSystem::from_settings(&settings)?;

    if target.is_dir() {
        let (courses, chunks) = rag.add_course_folder(&target).await?;
        Output::success(&format!("Loaded {} courses ({} chunks)", courses, chunks));
    } else {
        let chunks = rag.add_course_document(&target).await?;
        Output::success(&format!("Loaded 1 course ({} chunks)", chunks));
    }

    let analytics = rag.course_analytics().await?;
    Output::kv("Courses in catalog", &analytics.total_courses.to_string());

    Ok(())
}
