//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use std::future::Future;

/// A single completion request sent to an LLM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Prompt text, sent as one user message
    pub prompt: String,

    /// Upper bound on the reply length, in tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a new request
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (kizuna-llm). One call is one
/// attempt; retrying is left to the caller.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a text completion
    fn generate(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
