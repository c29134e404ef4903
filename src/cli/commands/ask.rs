//! One-shot question answering.

use super::build_system;
use crate::cli::Output;
use crate::config::Settings;

/// Ask a single question without session context.
pub async fn run_ask(question: &str, model: Option<String>, settings: Settings) -> anyhow::Result<()> {
    let rag = build_system(&settings, model).await?;

    let (answer, sources) = rag.query(question, None).await?;

    println!("\n{}", answer);
    if !sources.is_empty() {
        Output::header("Sources");
        for source in &sources {
            Output::source(&source.source, source.link.as_deref());
        }
    }

    Ok(())
}
