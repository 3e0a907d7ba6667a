//! Session pipeline controller
//!
//! One session owns a [`SessionState`] value: the ordered chat transcript
//! plus the current embedding index and answer generator, both absent until
//! the first successful processing run. The [`SessionPipeline`] drives the
//! two actions a session supports: process uploaded documents into a fresh
//! index, and answer a question against it.

use chrono::Local;
use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::index::EmbeddingIndex;
use crate::ingestion::{extract_text, TextChunker};
use crate::providers::{EmbeddingProvider, LlmProvider, VectorStore};

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn in the chat transcript, never mutated after append
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Wall-clock HH:MM at the time the action ran
    pub timestamp: String,
}

impl Message {
    fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }

    fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// An uploaded file: raw bytes plus the name it arrived under. Dropped once
/// its text has been extracted.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Summary of a completed processing run
#[derive(Debug, Clone, Copy)]
pub struct ProcessOutcome {
    /// Documents processed
    pub documents: usize,
    /// Chunks indexed
    pub chunks: usize,
}

/// Per-session mutable state
///
/// Invariant: `index` and `generator` are set together, if and only if at
/// least one processing run has succeeded since the session started.
#[derive(Default)]
pub struct SessionState {
    messages: Vec<Message>,
    index: Option<EmbeddingIndex>,
    generator: Option<Arc<dyn LlmProvider>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ordered transcript, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True once a processing run has succeeded
    pub fn is_ready(&self) -> bool {
        self.index.is_some() && self.generator.is_some()
    }

    /// The current index, if any
    pub fn index(&self) -> Option<&EmbeddingIndex> {
        self.index.as_ref()
    }
}

/// Drives the ingestion → retrieval → answer pipeline for one session
pub struct SessionPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmProvider>,
    chunker: TextChunker,
    collection: String,
    top_k: usize,
}

impl SessionPipeline {
    /// Wire the pipeline from configuration and provider instances
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmProvider>,
        config: &ChatConfig,
    ) -> Result<Self> {
        Ok(Self {
            embedder,
            store,
            llm,
            chunker: TextChunker::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?,
            collection: config.qdrant.collection.clone(),
            top_k: config.retrieval.top_k,
        })
    }

    /// Extract, chunk, and index the uploaded documents, then install the
    /// resulting index and a generator into the session.
    ///
    /// Replace-or-noop: the session's previous index and generator survive
    /// untouched unless the whole chain succeeds. A successful run fully
    /// supersedes any prior index; the chat transcript is kept.
    pub async fn process_documents(
        &self,
        state: &mut SessionState,
        documents: &[UploadedDocument],
    ) -> Result<ProcessOutcome> {
        if documents.is_empty() {
            return Err(Error::InvalidInput("no documents to process".to_string()));
        }

        let mut chunks = Vec::new();
        for document in documents {
            let extracted = extract_text(&document.filename, &document.data)?;
            let document_chunks = self.chunker.chunk(&extracted.text);
            tracing::info!(
                filename = %extracted.filename,
                pages = extracted.page_count,
                chunks = document_chunks.len(),
                "extracted document"
            );
            chunks.extend(document_chunks);
        }

        let chunk_count = chunks.len();
        let index = EmbeddingIndex::build(
            Arc::clone(&self.embedder),
            Arc::clone(&self.store),
            &self.collection,
            chunks,
        )
        .await?;

        // Atomic swap: nothing above mutated the session
        state.index = Some(index);
        state.generator = Some(Arc::clone(&self.llm));

        tracing::info!(
            documents = documents.len(),
            chunks = chunk_count,
            "documents processed"
        );

        Ok(ProcessOutcome {
            documents: documents.len(),
            chunks: chunk_count,
        })
    }

    /// Answer a question against the session's current index.
    ///
    /// The user message is appended as soon as the question passes
    /// validation, so failed attempts stay visible in the transcript. The
    /// assistant message is appended only when generation succeeds, stamped
    /// with the same timestamp as the user message.
    pub async fn ask(&self, state: &mut SessionState, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("question must not be empty".to_string()));
        }

        let timestamp = Local::now().format("%H:%M").to_string();
        state
            .messages
            .push(Message::user(question, timestamp.clone()));

        let (index, generator) = match (&state.index, &state.generator) {
            (Some(index), Some(generator)) => (index, generator),
            _ => return Err(Error::NotReady),
        };

        let started = std::time::Instant::now();
        let results = index.retrieve(question, self.top_k).await?;
        let context = PromptBuilder::build_context(&results);
        let prompt = PromptBuilder::build_prompt(question, &context);

        let answer = generator
            .generate(&prompt)
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        tracing::info!(
            retrieved = results.len(),
            answer_chars = answer.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "question answered"
        );

        state
            .messages
            .push(Message::assistant(answer.clone(), timestamp));

        Ok(answer)
    }
}
