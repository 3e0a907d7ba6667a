//! MediChat: retrieval-augmented question answering over uploaded PDFs
//!
//! The pipeline turns uploaded medical PDFs into an embedding index and
//! answers free-form questions against it:
//!
//! 1. **Ingestion**: extract text from PDF bytes, split it into fixed-size
//!    overlapping chunks ([`ingestion`])
//! 2. **Indexing**: embed every chunk and store the vectors in a Qdrant
//!    collection ([`index`])
//! 3. **Answering**: embed the question, retrieve the most similar chunks,
//!    and compose a grounded prompt for the chat model ([`generation`],
//!    [`session`])
//!
//! Provider traits in [`providers`] keep the embedding, storage, and chat
//! backends swappable; the shipped implementations speak the OpenAI and
//! Qdrant REST APIs.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod providers;
pub mod session;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use index::EmbeddingIndex;
pub use session::{Message, ProcessOutcome, Role, SessionPipeline, SessionState, UploadedDocument};
