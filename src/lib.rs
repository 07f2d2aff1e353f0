//! # Term Extractor
//!
//! Turns an LLM's free-form answer to "explain the jargon in this text" into
//! a reliable, non-empty list of `term`/`explanation` records.
//!
//! Models are asked for a bare JSON array, but they wrap it in code fences,
//! chat around it, break the JSON, or ignore the format entirely. The
//! [`output_parser`] cascade copes with all of that and always hands back at
//! least one record.
//!
//! ## Core Concepts
//!
//! - **[`extract_terms`]**: raw response text in, [`TermList`] out. Pure,
//!   synchronous, never fails.
//! - **[`TermRecord`]**: immutable `term`/`explanation` pair with an
//!   identity token ([`RecordId`]) that is not part of equality.
//! - **[`TermList`]**: ordered records, non-empty by construction.
//! - **[`Explainer`]**: optional end-to-end call: prompt, Gemini request,
//!   status sentinels, then the cascade.
//! - **[`SavedTermsStore`]**: de-duplicating, JSON-persisted saved list.
//!
//! ## Quick Start
//!
//! ```
//! use term_extractor::extract_terms;
//!
//! let raw = "Sure! ```json\n[{\"term\":\"RAG\",\"explanation\":\"Retrieval-augmented generation.\"}]\n```";
//! let terms = extract_terms(raw);
//! assert_eq!(terms.first().term(), "RAG");
//!
//! let prose = extract_terms("RAG: Retrieval: a technique");
//! assert_eq!(prose.first().explanation(), "Retrieval: a technique");
//! ```

pub mod backend;
pub mod diagnostics;
pub mod error;
pub mod explainer;
pub mod output_parser;
pub mod prompt;
pub mod record;
pub mod status;
pub mod store;

pub use backend::{BackoffConfig, GeminiBackend, GenerationConfig, MockBackend};
pub use diagnostics::{ExtractDiagnostics, ExtractStage};
pub use error::{ExplainError, Result};
pub use explainer::{Explainer, ExplainerBuilder, Explanation};
pub use output_parser::{extract_terms, extract_terms_with_diagnostics};
pub use record::{RecordId, TermList, TermRecord};
pub use store::SavedTermsStore;
