//! The extraction cascade.
//!
//! Turns any LLM response into a non-empty [`TermList`]. Stages run strictest
//! first and the first one that yields at least one valid record wins:
//!
//! ```text
//! raw ──► normalize ──► strict ──► permissive ──┐
//!  │                                            │ nothing
//!  └──────────────────────────► line_heuristic ◄┘
//!                                     │ nothing
//!                                     ▼
//!                                  fallback (always one record)
//! ```
//!
//! Nothing in here fails. Bad input only lowers the quality of the answer.

use tracing::debug;

use crate::diagnostics::{ExtractDiagnostics, ExtractStage};
use crate::output_parser::lines::line_heuristic;
use crate::output_parser::normalize::{clean_markdown, normalize};
use crate::output_parser::structured::{permissive, strict};
use crate::record::{TermList, TermRecord};

/// Term used for the single record produced when no structure is found.
pub const FALLBACK_TERM: &str = "Result";

/// Explanation used by the fallback when the response has no text at all.
pub const PARSE_FAILURE_NOTICE: &str = "Could not parse the response. Try again.";

/// Records produced by one stage, plus what it had to throw away.
#[derive(Debug, Default)]
pub(crate) struct Attempt {
    pub(crate) records: Vec<TermRecord>,
    pub(crate) discarded: usize,
    pub(crate) repaired: bool,
}

impl Attempt {
    /// Keep the `Some`s in order and count the `None`s as discarded.
    pub(crate) fn collect(candidates: impl IntoIterator<Item = Option<TermRecord>>) -> Self {
        let mut attempt = Attempt::default();
        for candidate in candidates {
            match candidate {
                Some(record) => attempt.records.push(record),
                None => attempt.discarded += 1,
            }
        }
        attempt
    }
}

/// What each stage gets to look at.
struct Input<'a> {
    raw: &'a str,
    normalized: String,
}

type StageFn = fn(&Input<'_>) -> Attempt;

const STAGES: [(ExtractStage, StageFn); 3] = [
    (ExtractStage::Strict, run_strict),
    (ExtractStage::Permissive, run_permissive),
    (ExtractStage::LineHeuristic, run_line_heuristic),
];

fn run_strict(input: &Input<'_>) -> Attempt {
    strict(&input.normalized)
}

fn run_permissive(input: &Input<'_>) -> Attempt {
    permissive(&input.normalized)
}

// Raw text, not the bracket-trimmed candidate.
fn run_line_heuristic(input: &Input<'_>) -> Attempt {
    line_heuristic(input.raw)
}

/// Extract term records from a raw LLM response.
///
/// Always returns at least one record. See
/// [`extract_terms_with_diagnostics`] to learn which stage produced them.
///
/// # Examples
///
/// ```
/// use term_extractor::output_parser::extract_terms;
///
/// let terms = extract_terms(r#"[{"term":"LLM","explanation":"A large language model."}]"#);
/// assert_eq!(terms.len(), 1);
/// assert_eq!(terms.first().term(), "LLM");
///
/// let fallback = extract_terms("complete gibberish with no structure");
/// assert_eq!(fallback.first().term(), "Result");
/// ```
pub fn extract_terms(raw: &str) -> TermList {
    extract_terms_with_diagnostics(raw).0
}

/// Like [`extract_terms`], also reporting which stage won.
#[tracing::instrument(skip(raw), fields(input_len = raw.len()))]
pub fn extract_terms_with_diagnostics(raw: &str) -> (TermList, ExtractDiagnostics) {
    let input = Input {
        raw,
        normalized: normalize(raw),
    };

    for (stage, run) in STAGES {
        let Attempt {
            records,
            discarded,
            repaired,
        } = run(&input);

        match TermList::from_vec(records) {
            Some(list) => {
                debug!(%stage, count = list.len(), discarded, repaired, "stage produced records");
                let diagnostics = ExtractDiagnostics {
                    stage,
                    discarded,
                    repaired,
                };
                return (list, diagnostics);
            }
            None => debug!(%stage, discarded, "stage produced nothing, advancing"),
        }
    }

    debug!(stage = %ExtractStage::Fallback, "no structure recovered");
    let diagnostics = ExtractDiagnostics {
        stage: ExtractStage::Fallback,
        discarded: 0,
        repaired: false,
    };
    (TermList::single(fallback(raw)), diagnostics)
}

/// Stage D: the whole cleaned response as one record.
fn fallback(raw: &str) -> TermRecord {
    let cleaned = clean_markdown(raw);
    if cleaned.is_empty() {
        TermRecord::new(FALLBACK_TERM, PARSE_FAILURE_NOTICE)
    } else {
        TermRecord::new(FALLBACK_TERM, cleaned)
    }
}
