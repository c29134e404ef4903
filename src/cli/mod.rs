//! CLI module for Kurs.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kurs - Course Materials RAG
///
/// A retrieval-augmented question-answering service over course documents.
/// The name "Kurs" is the Norwegian word for "course."
#[derive(Parser, Debug)]
#[command(name = "kurs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load course documents into the index and show catalog statistics
    Ingest {
        /// Course document file or folder (defaults to the configured docs dir)
        path: Option<String>,
    },

    /// Ask a single question (no session context)
    Ask {
        /// The question to ask
        question: String,

        /// LLM model to use for response generation
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Start an interactive chat session with conversation context
    Chat {
        /// LLM model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List courses in the catalog
    Courses,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
}
