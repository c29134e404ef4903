//! Interactive chat session.

use super::build_system;
use crate::cli::Output;
use crate::config::Settings;
use std::io::{BufRead, Write};

/// Run an interactive chat loop with per-session conversation context.
pub async fn run_chat(model: Option<String>, settings: Settings) -> anyhow::Result<()> {
    let rag = build_system(&settings, model).await?;
    let session_id = rag.session_manager.create_session();

    Output::header("Kurs Chat");
    Output::info("Ask about your courses. Type 'exit' or press Ctrl+D to quit.");
    println!();

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("you> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match rag.query(question, Some(&session_id)).await {
            Ok((answer, sources)) => {
                println!("\n{}\n", answer);
                for source in &sources {
                    Output::source(&source.source, source.link.as_deref());
                }
                if !sources.is_empty() {
                    println!();
                }
            }
            Err(e) => Output::error(&format!("Query failed: {}", e)),
        }
    }

    Output::info("Goodbye!");
    Ok(())
}
