use std::time::Duration;
use thiserror::Error;

/// Errors produced by the explainer and its collaborators.
///
/// The extraction core ([`extract_terms`](crate::output_parser::extract_terms))
/// never returns one of these; only transport, configuration and
/// persistence layers do.
#[derive(Error, Debug)]
pub enum ExplainError {
    /// Low-level HTTP transport failure (connection refused, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON encoding or decoding failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the saved-terms file failed.
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The explanation request was cancelled via the cancellation flag.
    #[error("Request was cancelled")]
    Cancelled,

    /// Invalid configuration detected at build time.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// HTTP error with status code, response body, and optional Retry-After hint.
    ///
    /// Returned by [`Backend`](crate::backend::Backend) implementations when
    /// the provider answers with a non-success status. The
    /// [`Explainer`](crate::Explainer) turns these into sentinel records.
    #[error("HTTP {status}: {body}")]
    HttpError {
        /// HTTP status code (e.g. 400, 429, 503).
        status: u16,
        /// Response body text.
        body: String,
        /// Parsed `Retry-After` header value, if present.
        retry_after: Option<Duration>,
    },

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ExplainError {
    fn from(err: anyhow::Error) -> Self {
        ExplainError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExplainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display() {
        let err = ExplainError::HttpError {
            status: 429,
            body: "quota".into(),
            retry_after: None,
        };
        assert_eq!(err.to_string(), "HTTP 429: quota");
    }

    #[test]
    fn from_anyhow() {
        let err: ExplainError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ExplainError::Other(ref m) if m == "boom"));
    }
}
