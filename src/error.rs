//! Error types for the question-answering pipeline

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
///
/// The first five variants are the kinds a caller of a pipeline action can
/// observe. `Embedding`, `VectorBackend`, and `Llm` are transport-level
/// errors raised by the providers; the pipeline re-maps them to the
/// phase-specific kind (`IndexBuild`, `Retrieval`, `Generation`) before they
/// reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Uploaded bytes could not be parsed as a PDF
    #[error("invalid document '{filename}': {reason}")]
    DocumentFormat { filename: String, reason: String },

    /// Embedding or storage failed while building the index
    #[error("index build failed: {0}")]
    IndexBuild(String),

    /// Similarity search failed at question time
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    /// The chat completion backend failed
    #[error("answer generation failed: {0}")]
    Generation(String),

    /// A question was asked before any documents were processed
    #[error("no documents have been processed yet")]
    NotReady,

    /// Caller-supplied input failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Embedding backend error (transport level)
    #[error("embedding backend error: {0}")]
    Embedding(String),

    /// Vector store backend error (transport level)
    #[error("vector store backend error: {0}")]
    VectorBackend(String),

    /// Chat completion backend error (transport level)
    #[error("chat backend error: {0}")]
    Llm(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a document format error
    pub fn document_format(filename: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DocumentFormat {
            filename: filename.into(),
            reason: reason.into(),
        }
    }

    /// True for errors the interactive surface should render as "process
    /// documents first" rather than as a backend failure.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady)
    }
}
