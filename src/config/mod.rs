//! Configuration module for Kurs.
//!
//! Handles loading and managing application settings and the system prompt.

mod prompts;
mod settings;

pub use prompts::Prompts;
pub use settings::{
    GeneralSettings, GenerationSettings, ServerSettings, SessionSettings, Settings,
};
