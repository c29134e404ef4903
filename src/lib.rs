//! Kurs - Course Materials RAG
//!
//! A retrieval-augmented question-answering service over a corpus of course
//! documents.
//!
//! The name "Kurs" is the Norwegian word for "course."
//!
//! # Overview
//!
//! Kurs allows you to:
//! - Ingest course documents into a searchable catalog
//! - Ask questions and get AI-powered answers backed by course content
//! - Let the model call search and outline tools on its own
//! - Keep short per-session conversation context across questions
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt management
//! - `engine` - Reasoning engine abstraction (chat model + tool calling)
//! - `tools` - Retrieval tools and the tool registry
//! - `generator` - The bounded tool-calling generation loop
//! - `session` - Per-session conversation history
//! - `vector_store` - Vector search abstraction over course content
//! - `ingest` - Course document parsing and loading
//! - `rag` - Top-level query coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use kurs::config::Settings;
//! use kurs::rag::RagSystem;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let rag = RagSystem::from_settings(&settings)?;
//!
//!     rag.add_course_folder(&settings.docs_dir()).await?;
//!     let (answer, sources) = rag.query("What is lesson 2 about?", None).await?;
//!     println!("{answer} ({} sources)", sources.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod ingest;
pub mod openai;
pub mod rag;
pub mod session;
pub mod tools;
pub mod vector_store;

pub use error::{KursError, Result};
