//! Prompt templates for retrieval-augmented answers

use crate::providers::ScoredText;

/// Separator between retrieved chunks in the context block
const CONTEXT_SEPARATOR: &str = "\n\n";

/// Prompt builder for document-grounded questions
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts into one context block
    pub fn build_context(results: &[ScoredText]) -> String {
        results
            .iter()
            .map(|result| result.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR)
    }

    /// Compose the fixed assistant prompt around retrieved context and the
    /// user's question
    pub fn build_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are MediChat Pro, an intelligent medical document assistant.
Based on the following medical documents, provide accurate and helpful answers.
If the information is not in the documents, clearly state that.

Medical Documents:
{context}

User Question: {question}

Answer:"#,
            context = context,
            question = question
        )
    }
}
