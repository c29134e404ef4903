//! Course catalog listing.

use super::build_system;
use crate::cli::Output;
use crate::config::Settings;

/// List courses in the catalog.
pub async fn run_courses(settings: Settings) -> anyhow::Result<()> {
    let rag = build_system(&settings, None).await?;
    let analytics = rag.course_analytics().await?;

    Output::header("Courses");
    if analytics.course_titles.is_empty() {
        Output::info("No courses in the catalog. Run 'kurs ingest' first.");
        return Ok(());
    }
    for title in &analytics.course_titles {
        Output::list_item(title);
    }
    println!();
    Output::kv("Total", &analytics.total_courses.to_string());

    Ok(())
}
