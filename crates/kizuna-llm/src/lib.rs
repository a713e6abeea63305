//! Kizuna LLM Provider Layer
//!
//! Provider implementations of the `LlmProvider` trait from `kizuna-domain`,
//! plus the retry policy callers wrap around them.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic, scriptable mock for testing
//! - `ChatCompletionsProvider`: OpenAI-compatible chat completions endpoint
//!
//! # Examples
//!
//! ```
//! use kizuna_domain::{CompletionRequest, LlmProvider};
//! use kizuna_llm::MockProvider;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = MockProvider::new("friendship");
//! let request = CompletionRequest::new("any prompt", 20);
//! assert_eq!(provider.generate(&request).await.unwrap(), "friendship");
//! # }
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod retry;

use kizuna_domain::{CompletionRequest, LlmProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

pub use chat::ChatCompletionsProvider;
pub use retry::{RetryExhausted, RetryPolicy};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The request did not finish in time
    #[error("Request timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credentials missing or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LlmError::Communication(_) | LlmError::Timeout | LlmError::RateLimitExceeded
        )
    }
}

/// A scripted reply rule: prompts containing `fragment` get `replies` in order
#[derive(Debug)]
struct Rule {
    fragment: String,
    replies: VecDeque<Result<String, LlmError>>,
}

impl Rule {
    /// Next reply; the last one repeats forever
    fn next_reply(&mut self) -> Result<String, LlmError> {
        if self.replies.len() > 1 {
            self.replies
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::Other("Empty mock rule".to_string())))
        } else {
            self.replies
                .front()
                .cloned()
                .unwrap_or_else(|| Err(LlmError::Other("Empty mock rule".to_string())))
        }
    }
}

/// Mock LLM provider for deterministic testing
///
/// Replies are matched by prompt *containment*: the first rule whose fragment
/// occurs in the prompt answers, in the order rules were added. Prompts that
/// match no rule get the default response. No network calls are made.
///
/// # Examples
///
/// ```
/// use kizuna_llm::{LlmError, MockProvider};
///
/// let mut provider = MockProvider::new("");
/// provider.add_response("Naruto and Sasuke", "rivals, friendship");
/// provider.add_error("Itachi", LlmError::Timeout);
/// provider.add_sequence(
///     "Gaara",
///     vec![Err(LlmError::RateLimitExceeded), Ok("allies".to_string())],
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    rules: Arc<Mutex<Vec<Rule>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for unmatched prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            rules: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reply with `response` to every prompt containing `fragment`
    pub fn add_response(&mut self, fragment: impl Into<String>, response: impl Into<String>) {
        self.push_rule(fragment.into(), vec![Ok(response.into())]);
    }

    /// Fail every prompt containing `fragment` with `error`
    pub fn add_error(&mut self, fragment: impl Into<String>, error: LlmError) {
        self.push_rule(fragment.into(), vec![Err(error)]);
    }

    /// Reply to prompts containing `fragment` with `replies` in order
    ///
    /// Once the sequence is down to its last reply, that reply repeats.
    pub fn add_sequence(
        &mut self,
        fragment: impl Into<String>,
        replies: Vec<Result<String, LlmError>>,
    ) {
        self.push_rule(fragment.into(), replies);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Number of calls whose prompt contained `fragment`
    pub fn calls_matching(&self, fragment: &str) -> usize {
        lock(&self.prompts)
            .iter()
            .filter(|p| p.contains(fragment))
            .count()
    }

    /// Every prompt received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Reset the call history
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }

    fn push_rule(&mut self, fragment: String, replies: Vec<Result<String, LlmError>>) {
        lock(&self.rules).push(Rule {
            fragment,
            replies: replies.into(),
        });
    }

    fn reply_for(&self, prompt: &str) -> Result<String, LlmError> {
        lock(&self.prompts).push(prompt.to_string());

        let mut rules = lock(&self.rules);
        match rules.iter_mut().find(|rule| prompt.contains(&rule.fragment)) {
            Some(rule) => rule.next_reply(),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.reply_for(&request.prompt)
    }
}

/// Lock a mock mutex, recovering the data if a test thread panicked with it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest::new(prompt, 20)
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate(&request("any prompt")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_matches_by_fragment() {
        let mut provider = MockProvider::default();
        provider.add_response("Naruto and Sasuke", "rivals");
        provider.add_response("clan of Naruto", "Uzumaki");

        assert_eq!(
            provider.generate(&request("tags for Naruto and Sasuke please")).await.unwrap(),
            "rivals"
        );
        assert_eq!(
            provider.generate(&request("Identify the clan of Naruto.")).await.unwrap(),
            "Uzumaki"
        );
        assert_eq!(
            provider.generate(&request("unknown")).await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_first_rule_wins() {
        let mut provider = MockProvider::default();
        provider.add_response("Naruto", "first");
        provider.add_response("Naruto and Sasuke", "second");

        assert_eq!(
            provider.generate(&request("Naruto and Sasuke")).await.unwrap(),
            "first"
        );
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate(&request("prompt1")).await.unwrap();
        provider.generate(&request("prompt2")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.calls_matching("prompt1"), 1);

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad prompt", LlmError::Timeout);

        let result = provider.generate(&request("a bad prompt")).await;
        assert_eq!(result.unwrap_err(), LlmError::Timeout);
    }

    #[tokio::test]
    async fn test_mock_provider_sequence_repeats_last() {
        let mut provider = MockProvider::default();
        provider.add_sequence(
            "flaky",
            vec![Err(LlmError::RateLimitExceeded), Ok("allies".to_string())],
        );

        assert!(provider.generate(&request("flaky")).await.is_err());
        assert_eq!(provider.generate(&request("flaky")).await.unwrap(), "allies");
        assert_eq!(provider.generate(&request("flaky")).await.unwrap(), "allies");
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate(&request("test")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_transient_classification() {
        assert!(LlmError::Communication("reset".into()).is_transient());
        assert!(LlmError::Timeout.is_transient());
        assert!(LlmError::RateLimitExceeded.is_transient());
        assert!(!LlmError::Unauthorized("no key".into()).is_transient());
        assert!(!LlmError::InvalidResponse("garbage".into()).is_transient());
    }
}
