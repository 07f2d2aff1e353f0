//! Backend trait and normalized request/response types.
//!
//! The [`Backend`] trait abstracts over LLM providers, translating between
//! normalized [`LlmRequest`]/[`LlmResponse`] types and a provider's HTTP API.
//! Built-in implementations: [`GeminiBackend`], [`MockBackend`].
//!
//! ## Architecture
//!
//! ```text
//! Explainer ──► LlmRequest ──► with_backoff(Backend::complete) ──► LlmResponse
//!                                         │
//!                              ┌──────────┴──────────┐
//!                        GeminiBackend           MockBackend
//!                     :generateContent        canned replies
//! ```

pub mod backoff;
pub mod gemini;
pub mod mock;

pub use backoff::BackoffConfig;
pub use gemini::GeminiBackend;
pub use mock::{MockBackend, MockReply};

use crate::error::Result;
use crate::ExplainError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Sampling settings sent with each request.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Temperature (0.0 = deterministic). Default: 0.2.
    pub temperature: f64,

    /// Maximum tokens to generate. Default: 500.
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_output_tokens: 500,
        }
    }
}

impl GenerationConfig {
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }
}

/// A normalized LLM request.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The fully rendered prompt.
    pub prompt: String,

    /// Sampling settings.
    pub config: GenerationConfig,
}

/// A normalized LLM response.
#[derive(Debug)]
pub struct LlmResponse {
    /// The generated text, or `None` if the provider's envelope carried no
    /// text where it should have.
    pub text: Option<String>,

    /// HTTP status code (for diagnostics/logging).
    pub status: u16,

    /// Provider-specific metadata (token counts, model version).
    pub metadata: Option<serde_json::Value>,
}

/// Abstraction over LLM providers.
///
/// Implementations return [`ExplainError::HttpError`] for non-success
/// statuses so the caller can retry or map them to sentinel records.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Execute a non-streaming LLM call.
    async fn complete(&self, client: &Client, request: &LlmRequest) -> Result<LlmResponse>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}

/// Check whether an error is worth retrying under `config`.
///
/// Retryable: [`ExplainError::HttpError`] with a status in
/// `config.retryable_statuses`, and [`ExplainError::Request`] (transport).
pub fn is_retryable(error: &ExplainError, config: &BackoffConfig) -> bool {
    match error {
        ExplainError::HttpError { status, .. } => config.retryable_statuses.contains(status),
        ExplainError::Request(_) => true,
        _ => false,
    }
}

/// Execute a backend call with transport-level retry and exponential backoff.
///
/// Returns the first successful response, or the last error once retries are
/// exhausted or a non-retryable error occurs. The cancellation flag is
/// checked before every attempt and after every delay.
pub async fn with_backoff(
    backend: &Arc<dyn Backend>,
    client: &Client,
    request: &LlmRequest,
    config: &BackoffConfig,
    cancel: Option<&AtomicBool>,
) -> Result<LlmResponse> {
    let is_cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));
    let mut last_error: Option<ExplainError> = None;

    for attempt in 0..=config.max_retries {
        if is_cancelled() {
            return Err(ExplainError::Cancelled);
        }

        if let Some(ref err) = last_error {
            let delay = match err {
                ExplainError::HttpError {
                    retry_after: Some(ra),
                    ..
                } if config.respect_retry_after => *ra,
                _ => config.delay_for_attempt(attempt - 1),
            };
            warn!(
                backend = backend.name(),
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "retrying LLM request"
            );
            tokio::time::sleep(delay).await;

            if is_cancelled() {
                return Err(ExplainError::Cancelled);
            }
        }

        match backend.complete(client, request).await {
            Ok(response) => return Ok(response),
            Err(e) if attempt < config.max_retries && is_retryable(&e, config) => {
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| ExplainError::Other("backoff loop exited unexpectedly".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request() -> LlmRequest {
        LlmRequest {
            prompt: "test".into(),
            config: GenerationConfig::default(),
        }
    }

    fn quick_retries(max_retries: u32) -> BackoffConfig {
        BackoffConfig {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
            ..BackoffConfig::standard()
        }
    }

    #[test]
    fn test_is_retryable_429() {
        let err = ExplainError::HttpError {
            status: 429,
            body: "rate limited".into(),
            retry_after: None,
        };
        assert!(is_retryable(&err, &BackoffConfig::standard()));
    }

    #[test]
    fn test_is_retryable_401_not_retried() {
        let err = ExplainError::HttpError {
            status: 401,
            body: "unauthorized".into(),
            retry_after: None,
        };
        assert!(!is_retryable(&err, &BackoffConfig::standard()));
    }

    #[test]
    fn test_is_retryable_cancelled_not_retried() {
        assert!(!is_retryable(&ExplainError::Cancelled, &BackoffConfig::standard()));
    }

    #[tokio::test]
    async fn test_backoff_respects_cancellation() {
        let cancel = AtomicBool::new(true);
        let backend: Arc<dyn Backend> = Arc::new(MockBackend::fixed("unused"));
        let result = with_backoff(
            &backend,
            &Client::new(),
            &request(),
            &BackoffConfig::standard(),
            Some(&cancel),
        )
        .await;
        assert!(matches!(result, Err(ExplainError::Cancelled)));
    }

    #[tokio::test]
    async fn test_backoff_retries_then_succeeds() {
        let mock = Arc::new(MockBackend::with_replies(vec![
            MockReply::Status(503),
            MockReply::Status(429),
            MockReply::Text("ok".into()),
        ]));
        let backend: Arc<dyn Backend> = mock.clone();
        let resp = with_backoff(&backend, &Client::new(), &request(), &quick_retries(3), None)
            .await
            .unwrap();
        assert_eq!(resp.text.as_deref(), Some("ok"));
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_backoff_gives_up_with_last_error() {
        let mock = Arc::new(MockBackend::with_replies(vec![MockReply::Status(429)]));
        let backend: Arc<dyn Backend> = mock.clone();
        let err = with_backoff(&backend, &Client::new(), &request(), &quick_retries(2), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExplainError::HttpError { status: 429, .. }));
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_backoff_does_not_retry_auth_failure() {
        let mock = Arc::new(MockBackend::with_replies(vec![
            MockReply::Status(403),
            MockReply::Text("never".into()),
        ]));
        let backend: Arc<dyn Backend> = mock.clone();
        let err = with_backoff(&backend, &Client::new(), &request(), &quick_retries(3), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExplainError::HttpError { status: 403, .. }));
        assert_eq!(mock.calls(), 1);
    }
}
