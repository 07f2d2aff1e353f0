//! # LLM Output Parser
//!
//! Turns whatever the model sent back into term records without calling the
//! model again. Handles code fences, chatty preambles, loose or broken JSON,
//! and plain `Term: explanation` prose.
//!
//! ## Entry Points
//!
//! | Function | Use Case |
//! |----------|----------|
//! | [`extract_terms`] | Raw response → non-empty [`TermList`](crate::TermList) |
//! | [`extract_terms_with_diagnostics`] | Same, plus which stage won |
//!
//! ## Shared Utilities
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`normalize`] | Isolate the bracketed payload inside a response |
//! | [`clean_markdown`] | Strip fences, emphasis, and heading markers |
//! | [`try_repair_json`] | Fix common LLM JSON errors |

pub mod cascade;
pub mod lines;
pub mod normalize;
pub mod repair;
pub mod structured;

pub use cascade::{
    extract_terms, extract_terms_with_diagnostics, FALLBACK_TERM, PARSE_FAILURE_NOTICE,
};
pub use normalize::{clean_markdown, normalize, strip_fence_markers};
pub use repair::try_repair_json;
