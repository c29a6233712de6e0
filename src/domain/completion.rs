//! Boundary to the external text-completion service used for content checks.
//!
//! The service is treated as a single-shot oracle: one request in, free-form
//! text out. Interpreting that text is the job of
//! [`crate::application::services::ContentClassifier`].

use async_trait::async_trait;

/// One chat-style completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Failures talking to the completion service.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion transport error: {0}")]
    Transport(String),

    #[error("completion service returned HTTP {0}")]
    Status(u16),

    #[error("completion service returned no answer")]
    EmptyResponse,
}

/// A remote completion endpoint.
///
/// # Implementations
///
/// - [`crate::infrastructure::classifier::OpenAiClient`] - OpenAI-compatible chat completions
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends a single request and returns the raw answer text.
    ///
    /// Implementations must not retry and must bound the call with a timeout.
    ///
    /// # Errors
    ///
    /// Returns a [`CompletionError`] on timeout, transport failure, non-success
    /// status, or when the answer is missing.
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError>;

    /// Short label for logs and health output.
    fn name(&self) -> &'static str;
}
