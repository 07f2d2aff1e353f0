//! Extraction diagnostics.
//!
//! [`ExtractDiagnostics`] records what happened inside the cascade: which
//! stage produced the records, how many candidates that stage threw away,
//! and whether JSON repair was needed.

use std::fmt;

/// One step of the extraction cascade, strictest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtractStage {
    /// Exact `[{"term", "explanation"}]` decode.
    Strict,
    /// Loose JSON decode with key aliases and repair.
    Permissive,
    /// `Term: explanation` lines.
    LineHeuristic,
    /// Whole text as a single record.
    Fallback,
}

impl ExtractStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractStage::Strict => "strict",
            ExtractStage::Permissive => "permissive",
            ExtractStage::LineHeuristic => "line_heuristic",
            ExtractStage::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ExtractStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Records what happened during extraction.
///
/// # Example
///
/// ```
/// use term_extractor::output_parser::extract_terms_with_diagnostics;
/// use term_extractor::diagnostics::ExtractStage;
///
/// let (_, diag) = extract_terms_with_diagnostics("LLM: A large language model.");
/// assert_eq!(diag.stage, ExtractStage::LineHeuristic);
/// assert!(!diag.fell_back());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractDiagnostics {
    /// The stage whose output was returned.
    pub stage: ExtractStage,

    /// Candidates the winning stage rejected (missing, blank, or non-string
    /// fields). Always 0 for [`ExtractStage::Fallback`].
    pub discarded: usize,

    /// Whether the winning stage had to repair the JSON first.
    pub repaired: bool,
}

impl ExtractDiagnostics {
    /// Did the cascade give up on finding structure?
    pub fn fell_back(&self) -> bool {
        self.stage == ExtractStage::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_ordered_strict_first() {
        assert!(ExtractStage::Strict < ExtractStage::Permissive);
        assert!(ExtractStage::Permissive < ExtractStage::LineHeuristic);
        assert!(ExtractStage::LineHeuristic < ExtractStage::Fallback);
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(ExtractStage::LineHeuristic.to_string(), "line_heuristic");
    }

    #[test]
    fn fallback_flag() {
        let d = ExtractDiagnostics {
            stage: ExtractStage::Fallback,
            discarded: 0,
            repaired: false,
        };
        assert!(d.fell_back());
    }
}
