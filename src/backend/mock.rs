//! Mock backend for testing without a live LLM.
//!
//! [`MockBackend`] plays back pre-configured replies in order, so the whole
//! explain path (status sentinels, retry, parsing) can be tested offline.
//!
//! # Example
//!
//! ```
//! use term_extractor::backend::{MockBackend, MockReply};
//!
//! let mock = MockBackend::with_replies(vec![
//!     MockReply::Status(429),
//!     MockReply::Text(r#"[{"term":"LLM","explanation":"A model."}]"#.into()),
//! ]);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, LlmRequest, LlmResponse};
use crate::error::Result;
use crate::ExplainError;

/// One canned outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A 200 response carrying this text.
    Text(String),
    /// A 200 response whose envelope has no text.
    Empty,
    /// A non-success status, returned as [`ExplainError::HttpError`].
    Status(u16),
}

/// A test backend that returns canned replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockBackend {
    /// Create a mock that answers with each text in turn.
    pub fn new(responses: Vec<String>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Text).collect())
    }

    /// Create a mock from arbitrary replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "MockBackend requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Number of `complete` calls so far.
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    /// The prompt of the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    fn next_reply(&self) -> MockReply {
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn complete(&self, _client: &Client, request: &LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(request.prompt.clone());
        }

        match self.next_reply() {
            MockReply::Text(text) => Ok(LlmResponse {
                text: Some(text),
                status: 200,
                metadata: None,
            }),
            MockReply::Empty => Ok(LlmResponse {
                text: None,
                status: 200,
                metadata: None,
            }),
            MockReply::Status(status) => Err(ExplainError::HttpError {
                status,
                body: format!("mock status {}", status),
                retry_after: None,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerationConfig;

    fn request() -> LlmRequest {
        LlmRequest {
            prompt: "explain this".into(),
            config: GenerationConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_mock_fixed_response() {
        let mock = MockBackend::fixed("Hello!");
        let resp = mock.complete(&Client::new(), &request()).await.unwrap();
        assert_eq!(resp.text.as_deref(), Some("Hello!"));
        assert_eq!(resp.status, 200);
        assert_eq!(mock.last_prompt().as_deref(), Some("explain this"));
    }

    #[tokio::test]
    async fn test_mock_cycles_replies() {
        let mock = MockBackend::with_replies(vec![MockReply::Text("first".into()), MockReply::Empty]);
        let client = Client::new();
        let r1 = mock.complete(&client, &request()).await.unwrap();
        let r2 = mock.complete(&client, &request()).await.unwrap();
        let r3 = mock.complete(&client, &request()).await.unwrap();
        assert_eq!(r1.text.as_deref(), Some("first"));
        assert!(r2.text.is_none());
        assert_eq!(r3.text.as_deref(), Some("first"));
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_status() {
        let mock = MockBackend::with_replies(vec![MockReply::Status(401)]);
        let err = mock.complete(&Client::new(), &request()).await.unwrap_err();
        assert!(matches!(err, ExplainError::HttpError { status: 401, .. }));
    }
}
