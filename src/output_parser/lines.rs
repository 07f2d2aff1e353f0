//! Stage C: recover `Term: explanation` pairs from plain lines.
//!
//! Runs on the raw response, since by this point nothing JSON-shaped was
//! found. Handles answers like:
//!
//! ```text
//! **LLM**: A large language model.
//! - RAG: Retrieval-augmented generation.
//! 2) GPU: A graphics processor.
//! ```

use crate::output_parser::cascade::Attempt;
use crate::output_parser::normalize::clean_markdown;
use crate::record::TermRecord;

const SEPARATOR: &str = ": ";

/// Bullet characters trimmed from line starts and from the term.
const BULLETS: &[char] = &['-', '\u{2022}'];

pub(crate) fn line_heuristic(raw: &str) -> Attempt {
    let cleaned = clean_markdown(raw);

    Attempt::collect(
        cleaned
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| {
                let line = strip_list_marker(line);
                let (term, explanation) = line.split_once(SEPARATOR)?;
                let term = term.trim().trim_matches(BULLETS);
                Some(TermRecord::from_parts(term, explanation))
            }),
    )
}

/// Remove a leading bullet (`-`, `•`) and/or ordinal (`1.`, `12)`).
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim_start_matches(BULLETS).trim_start();

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(after) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            if after.starts_with(char::is_whitespace) {
                return after.trim_start();
            }
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &str) -> Vec<(String, String)> {
        line_heuristic(raw)
            .records
            .into_iter()
            .map(|r| (r.term().to_string(), r.explanation().to_string()))
            .collect()
    }

    #[test]
    fn splits_on_first_separator_only() {
        assert_eq!(
            pairs("RAG: Retrieval: a technique"),
            vec![("RAG".into(), "Retrieval: a technique".into())]
        );
    }

    #[test]
    fn prose_with_colon() {
        assert_eq!(
            pairs("no json here, just: an explanation"),
            vec![("no json here, just".into(), "an explanation".into())]
        );
    }

    #[test]
    fn markdown_bullets() {
        let raw = "# Terms\n\n* **LLM**: A large language model.\n- RAG: Retrieval.\n• GPU: A chip.\n";
        assert_eq!(
            pairs(raw),
            vec![
                ("LLM".into(), "A large language model.".into()),
                ("RAG".into(), "Retrieval.".into()),
                ("GPU".into(), "A chip.".into()),
            ]
        );
    }

    #[test]
    fn numbered_list() {
        let raw = "1. LLM: A model.\n2) RAG: Retrieval.";
        let terms: Vec<String> = pairs(raw).into_iter().map(|(t, _)| t).collect();
        assert_eq!(terms, vec!["LLM", "RAG"]);
    }

    #[test]
    fn ordinal_without_space_is_kept() {
        assert_eq!(strip_list_marker("3.5: a version"), "3.5: a version");
    }

    #[test]
    fn time_like_colon_is_not_a_separator() {
        assert!(pairs("Meet at 10:30 tomorrow").is_empty());
    }

    #[test]
    fn empty_sides_discarded() {
        let attempt = line_heuristic("- : orphan explanation\nTerm:  \nOK: fine");
        let terms: Vec<&str> = attempt.records.iter().map(|r| r.term()).collect();
        assert_eq!(terms, vec!["OK"]);
        assert_eq!(attempt.discarded, 1);
    }

    #[test]
    fn fenced_lines() {
        let raw = "```\nLLM: A model.\n```";
        assert_eq!(pairs(raw), vec![("LLM".into(), "A model.".into())]);
    }

    #[test]
    fn nothing_matches() {
        assert!(pairs("complete gibberish with no structure").is_empty());
        assert!(pairs("").is_empty());
    }
}
