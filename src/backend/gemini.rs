//! Backend for Google's Gemini `generateContent` API.
//!
//! Request body:
//!
//! ```text
//! {"contents": [{"parts": [{"text": PROMPT}]}],
//!  "generationConfig": {"maxOutputTokens": N, "temperature": T}}
//! ```
//!
//! The answer text lives at `candidates[0].content.parts[0].text`.

use super::{Backend, LlmRequest, LlmResponse};
use crate::error::Result;
use crate::ExplainError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Default model endpoint.
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-lite:generateContent";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Backend for Gemini's `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiBackend {
    endpoint: String,
    api_key: String,
}

impl GeminiBackend {
    /// Backend for [`DEFAULT_ENDPOINT`] authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point at a different model or a proxy.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the JSON body for `generateContent`.
    pub fn build_body(request: &LlmRequest) -> Value {
        json!({
            "contents": [
                {"parts": [{"text": request.prompt}]}
            ],
            "generationConfig": {
                "maxOutputTokens": request.config.max_output_tokens,
                "temperature": request.config.temperature,
            }
        })
    }

    /// Pull the answer text out of a `generateContent` response.
    pub fn extract_text(response: &Value) -> Option<String> {
        response
            .get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")?
            .as_str()
            .map(str::to_string)
    }

    fn extract_metadata(response: &Value) -> Option<Value> {
        let mut meta = serde_json::Map::new();
        for key in ["usageMetadata", "modelVersion"] {
            if let Some(v) = response.get(key) {
                meta.insert(key.into(), v.clone());
            }
        }
        if meta.is_empty() {
            None
        } else {
            Some(Value::Object(meta))
        }
    }

    /// Parse a Retry-After header value as seconds.
    fn parse_retry_after(value: &str) -> Option<Duration> {
        value.trim().parse::<u64>().ok().map(Duration::from_secs)
    }
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn complete(&self, client: &Client, request: &LlmRequest) -> Result<LlmResponse> {
        let body = Self::build_body(request);
        let resp = client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(Self::parse_retry_after);
            let text = resp.text().await.unwrap_or_default();
            return Err(ExplainError::HttpError {
                status,
                body: text,
                retry_after,
            });
        }

        // A 2xx body that is not JSON is treated like a missing envelope.
        let bytes = resp.bytes().await?;
        let json_resp: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Ok(LlmResponse {
            text: Self::extract_text(&json_resp),
            status,
            metadata: Self::extract_metadata(&json_resp),
        })
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::GenerationConfig;

    #[test]
    fn test_build_body() {
        let request = LlmRequest {
            prompt: "Explain RAG".into(),
            config: GenerationConfig::default(),
        };
        let body = GeminiBackend::build_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Explain RAG");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 500);
        assert_eq!(body["generationConfig"]["temperature"], 0.2);
    }

    #[test]
    fn test_extract_text() {
        let resp = json!({
            "candidates": [{"content": {"parts": [{"text": "[{\"term\":\"A\"}]"}], "role": "model"}}],
            "modelVersion": "gemini-2.5-flash-lite"
        });
        assert_eq!(
            GeminiBackend::extract_text(&resp).as_deref(),
            Some("[{\"term\":\"A\"}]")
        );
        let meta = GeminiBackend::extract_metadata(&resp).unwrap();
        assert_eq!(meta["modelVersion"], "gemini-2.5-flash-lite");
    }

    #[test]
    fn test_extract_text_missing() {
        assert!(GeminiBackend::extract_text(&json!({"candidates": []})).is_none());
        assert!(GeminiBackend::extract_text(&json!({"promptFeedback": {}})).is_none());
        assert!(GeminiBackend::extract_text(&Value::Null).is_none());
        let non_string = json!({"candidates": [{"content": {"parts": [{"text": 5}]}}]});
        assert!(GeminiBackend::extract_text(&non_string).is_none());
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(
            GeminiBackend::parse_retry_after(" 30 "),
            Some(Duration::from_secs(30))
        );
        assert_eq!(GeminiBackend::parse_retry_after("soon"), None);
    }

    #[test]
    fn test_debug_redacts_key() {
        let backend = GeminiBackend::new("secret-key");
        assert!(!format!("{:?}", backend).contains("secret-key"));
        assert_eq!(backend.endpoint(), DEFAULT_ENDPOINT);
    }
}
