//! CLI command implementations.

mod ask;
mod chat;
mod courses;
mod ingest;
mod serve;

pub use ask::run_ask;
pub use chat::run_chat;
pub use courses::run_courses;
pub use ingest::run_ingest;
pub use serve::run_serve;

use crate::config::Settings;
use crate::rag::RagSystem;

/// Build a RAG system from settings and load the configured docs folder.
pub(crate) async fn build_system(settings: &Settings, model: Option<String>) -> anyhow::Result<RagSystem> {
    let mut settings = settings.clone();
    if let Some(model) = model {
        settings.generation.model = model;
    }

    let rag = RagSystem::from_settings(&settings)?;

    let docs_dir = settings.docs_dir();
    if docs_dir.exists() {
        rag.add_course_folder(&docs_dir).await?;
    }

    Ok(rag)
}
