//! Answer generation: prompt composition for the chat completion backend

pub mod prompt;

pub use prompt::PromptBuilder;
