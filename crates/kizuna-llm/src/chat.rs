//! OpenAI-compatible chat completions provider
//!
//! Talks to any endpoint exposing `POST {endpoint}/chat/completions` with a
//! bearer token, such as the DashScope compatible mode used by the reference
//! configuration.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint, model, API key and timeout
//! - Status codes mapped onto [`LlmError`] so callers can tell transient
//!   failures from permanent ones
//!
//! One call is one HTTP request; wrap it in a [`crate::RetryPolicy`] to retry.
//!
//! # Examples
//!
//! ```no_run
//! use kizuna_llm::ChatCompletionsProvider;
//!
//! let provider = ChatCompletionsProvider::new(
//!     "https://dashscope-intl.aliyuncs.com/compatible-mode/v1",
//!     "qwen-max",
//! )
//! .unwrap()
//! .with_api_key("sk-...");
//! ```

use crate::LlmError;
use kizuna_domain::{CompletionRequest, LlmProvider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default endpoint of the reference configuration
pub const DEFAULT_ENDPOINT: &str = "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";

/// Default model of the reference configuration
pub const DEFAULT_MODEL: &str = "qwen-max";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Provider for OpenAI-compatible chat completion APIs
pub struct ChatCompletionsProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ChatCompletionsProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL, without the `/chat/completions` suffix
    /// - `model`: Model to use (e.g., "qwen-max", "gpt-4o-mini")
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            timeout,
            client: build_client(timeout)?,
        })
    }

    /// Set the bearer token sent with each request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    /// Model name sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Send one chat completion request
    ///
    /// # Errors
    ///
    /// - `Timeout` / `Communication` for transport failures and 5xx replies
    /// - `RateLimitExceeded` for HTTP 429
    /// - `Unauthorized` for HTTP 401/403
    /// - `ModelNotAvailable` for HTTP 404
    /// - `InvalidResponse` when the body is not a chat completion
    pub async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            max_tokens: request.max_tokens,
        };

        let mut builder = self.client.post(self.url()).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Communication(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                429 => LlmError::RateLimitExceeded,
                401 | 403 => LlmError::Unauthorized(format!("HTTP {}: {}", status, error_text)),
                404 => LlmError::ModelNotAvailable(self.model.clone()),
                code if code >= 500 => {
                    LlmError::Communication(format!("HTTP {}: {}", status, error_text))
                }
                _ => LlmError::Other(format!("HTTP {}: {}", status, error_text)),
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No message content in reply".to_string()))?;

        debug!(model = %self.model, reply_len = content.len(), "Chat completion received");
        Ok(content)
    }
}

impl LlmProvider for ChatCompletionsProvider {
    type Error = LlmError;

    async fn generate(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        self.complete(request).await
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}
