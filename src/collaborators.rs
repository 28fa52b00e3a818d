//! External collaborators consulted before the deterministic path
//!
//! A [`ContextSource`] supplies retrieved documents and a [`LanguageModel`]
//! turns a prompt into an answer. Either may be unavailable; the composer
//! treats failure and empty output the same way and falls through.

use crate::error::Result;

/// Returned by a context source when nothing relevant was found
pub const NO_CONTEXT_SENTINEL: &str = "No specific information found.";

/// Retrieval collaborator: up to `limit` relevant documents as one text blob
pub trait ContextSource: Send + Sync {
    fn relevant_context(&self, query: &str, limit: usize) -> Result<String>;
}

/// Completion collaborator. Retries and model fallback are its own concern.
pub trait LanguageModel: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// True when a context blob carries no usable information
pub fn is_empty_context(context: &str) -> bool {
    let trimmed = context.trim();
    trimmed.is_empty() || trimmed == NO_CONTEXT_SENTINEL
}

/// Prompt for a context-grounded answer
pub fn build_prompt(persona: &str, owner: &str, query: &str, context: &str) -> String {
    format!(
        "You are {persona}, an assistant that answers questions about {owner}'s professional profile.\n\
         Answer only from the context below. If the context does not contain the answer, say that you do not have that information.\n\n\
         Context:\n{context}\n\n\
         Question: {query}\n\
         Answer:",
        persona = persona,
        owner = owner,
        context = context.trim(),
        query = query.trim(),
    )
}
