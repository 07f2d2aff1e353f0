//! The end-to-end explain call.
//!
//! [`Explainer`] renders the prompt, sends it through a [`Backend`] with
//! optional retry, maps provider failures to sentinel records, and hands
//! successful text to [`extract_terms_with_diagnostics`]. Apart from
//! transport errors and cancellation, every path ends in a [`TermList`].

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::backend::{with_backoff, Backend, BackoffConfig, GeminiBackend, GenerationConfig, LlmRequest};
use crate::diagnostics::ExtractDiagnostics;
use crate::error::Result;
use crate::output_parser::extract_terms_with_diagnostics;
use crate::prompt::{explain_prompt, DEFAULT_MAX_WORDS};
use crate::record::TermList;
use crate::status;
use crate::ExplainError;

/// Environment variable read by [`ExplainerBuilder::api_key_from_env`].
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Value shipped in templates and config files before a real key is pasted.
const API_KEY_PLACEHOLDER: &str = "PASTE_YOUR_GEMINI_API_KEY_HERE";

/// Default HTTP timeout for one request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Result of one explain call.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// The records to show. Never empty.
    pub terms: TermList,

    /// The model's raw text, when a response reached the parser.
    pub raw_response: Option<String>,

    /// How the parser got its records. `None` for sentinel outcomes.
    pub diagnostics: Option<ExtractDiagnostics>,
}

impl Explanation {
    fn sentinel(terms: TermList) -> Self {
        Self {
            terms,
            raw_response: None,
            diagnostics: None,
        }
    }

    /// Whether the records came from the status table rather than the model.
    pub fn is_sentinel(&self) -> bool {
        self.diagnostics.is_none()
    }
}

/// Explains jargon in a piece of text.
///
/// # Example
///
/// ```no_run
/// use term_extractor::Explainer;
///
/// # async fn run() -> term_extractor::Result<()> {
/// let explainer = Explainer::builder().api_key_from_env().build()?;
/// for record in explainer.explain("We fine-tuned an LLM with LoRA.").await? {
///     println!("{}: {}", record.term(), record.explanation());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Explainer {
    client: Client,
    backend: Option<Arc<dyn Backend>>,
    generation: GenerationConfig,
    backoff: BackoffConfig,
    max_words: u32,
    cancellation: Option<Arc<AtomicBool>>,
}

impl Explainer {
    pub fn builder() -> ExplainerBuilder {
        ExplainerBuilder::default()
    }

    /// Explain `text`, returning only the records.
    pub async fn explain(&self, text: &str) -> Result<TermList> {
        Ok(self.explain_detailed(text).await?.terms)
    }

    /// Explain `text`, keeping the raw response and parse diagnostics.
    ///
    /// Errors only on transport failure or cancellation. Missing keys,
    /// non-success statuses and unreadable envelopes become sentinel records.
    pub async fn explain_detailed(&self, text: &str) -> Result<Explanation> {
        self.check_cancelled()?;

        let Some(backend) = &self.backend else {
            warn!("no API key configured");
            return Ok(Explanation::sentinel(status::missing_api_key()));
        };

        let request = LlmRequest {
            prompt: explain_prompt(text, self.max_words),
            config: self.generation.clone(),
        };

        let response = match with_backoff(
            backend,
            &self.client,
            &request,
            &self.backoff,
            self.cancellation.as_deref(),
        )
        .await
        {
            Ok(response) => response,
            Err(ExplainError::HttpError { status, body, .. }) => {
                warn!(backend = backend.name(), status, body = %body, "provider rejected request");
                let terms = status::sentinel_for_status(status)
                    .unwrap_or_else(status::unreadable_response);
                return Ok(Explanation::sentinel(terms));
            }
            Err(e) => return Err(e),
        };

        let Some(raw) = response.text else {
            warn!(backend = backend.name(), status = response.status, "response carried no text");
            return Ok(Explanation::sentinel(status::unreadable_response()));
        };

        let (terms, diagnostics) = extract_terms_with_diagnostics(&raw);
        debug!(
            backend = backend.name(),
            stage = %diagnostics.stage,
            count = terms.len(),
            "explained text"
        );

        Ok(Explanation {
            terms,
            raw_response: Some(raw),
            diagnostics: Some(diagnostics),
        })
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ExplainError::Cancelled);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Explainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explainer")
            .field("backend", &self.backend.as_ref().map(|b| b.name()))
            .field("generation", &self.generation)
            .field("backoff", &self.backoff)
            .field("max_words", &self.max_words)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish()
    }
}

/// Builder for [`Explainer`].
#[derive(Default)]
pub struct ExplainerBuilder {
    client: Option<Client>,
    backend: Option<Arc<dyn Backend>>,
    api_key: Option<String>,
    endpoint: Option<String>,
    generation: GenerationConfig,
    backoff: BackoffConfig,
    max_words: Option<u32>,
    cancellation: Option<Arc<AtomicBool>>,
    timeout: Option<Duration>,
}

impl ExplainerBuilder {
    /// Set the HTTP client. If not set, one is built with the configured timeout.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Use a specific backend. Overrides `api_key` and `endpoint`.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Gemini API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Read the Gemini API key from `GEMINI_API_KEY`, if set.
    pub fn api_key_from_env(mut self) -> Self {
        if let Ok(key) = env::var(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        self
    }

    /// Gemini endpoint. Default: [`DEFAULT_ENDPOINT`](crate::backend::gemini::DEFAULT_ENDPOINT).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn generation(mut self, config: GenerationConfig) -> Self {
        self.generation = config;
        self
    }

    /// Transport retry policy. Default: [`BackoffConfig::none()`].
    pub fn backoff(mut self, config: BackoffConfig) -> Self {
        self.backoff = config;
        self
    }

    /// Word cap stated in the prompt. Default: 30.
    pub fn max_words(mut self, words: u32) -> Self {
        self.max_words = Some(words);
        self
    }

    /// Set a cancellation flag checked before each attempt.
    pub fn cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Request timeout. Default: 15 seconds. Ignored when a client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<Explainer> {
        let max_words = self.max_words.unwrap_or(DEFAULT_MAX_WORDS);
        if max_words == 0 {
            return Err(ExplainError::InvalidConfig("max_words must be at least 1".into()));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(ExplainError::InvalidConfig(format!(
                "temperature {} outside 0.0..=2.0",
                self.generation.temperature
            )));
        }
        if self.generation.max_output_tokens == 0 {
            return Err(ExplainError::InvalidConfig(
                "max_output_tokens must be at least 1".into(),
            ));
        }

        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()?,
        };

        let backend = self.backend.or_else(|| {
            let key = self.api_key.filter(|k| usable_key(k))?;
            let mut gemini = GeminiBackend::new(key);
            if let Some(endpoint) = self.endpoint {
                gemini = gemini.with_endpoint(endpoint);
            }
            Some(Arc::new(gemini) as Arc<dyn Backend>)
        });

        Ok(Explainer {
            client,
            backend,
            generation: self.generation,
            backoff: self.backoff,
            max_words,
            cancellation: self.cancellation,
        })
    }
}

fn usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != API_KEY_PLACEHOLDER
}
