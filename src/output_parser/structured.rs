//! JSON decoders for the first two cascade stages.
//!
//! [`strict`] wants exactly what the prompt asked for: an array of objects
//! with string `term` and `explanation` fields. [`permissive`] accepts what
//! models tend to produce instead: other key spellings, a lone object, or
//! JSON that needs [`try_repair_json`] before it parses.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::output_parser::cascade::Attempt;
use crate::output_parser::repair::try_repair_json;
use crate::record::TermRecord;

/// Keys accepted as the term field by [`permissive`], lowercase.
const TERM_KEYS: &[&str] = &["term", "name", "word", "acronym", "jargon", "title", "keyword"];

/// Keys accepted as the explanation field by [`permissive`], lowercase.
const EXPLANATION_KEYS: &[&str] = &[
    "explanation",
    "definition",
    "description",
    "meaning",
    "explain",
    "summary",
];

#[derive(Deserialize)]
struct StrictEntry {
    term: String,
    explanation: String,
}

/// Stage A: decode a JSON array of `{"term", "explanation"}` objects.
///
/// Each element is decoded on its own. Extra fields are ignored; an element
/// missing either field, or holding a non-string, is discarded.
pub(crate) fn strict(candidate: &str) -> Attempt {
    let Ok(items) = serde_json::from_str::<Vec<Value>>(candidate) else {
        return Attempt::default();
    };

    Attempt::collect(items.into_iter().map(|item| {
        serde_json::from_value::<StrictEntry>(item)
            .ok()
            .and_then(|entry| TermRecord::from_parts(&entry.term, &entry.explanation))
    }))
}

/// Stage B: decode loosely shaped JSON.
///
/// Accepts an array of objects or a single object, after repair if the text
/// does not parse as-is. Field names are matched case-insensitively against
/// [`TERM_KEYS`] and [`EXPLANATION_KEYS`]; both values must be strings.
pub(crate) fn permissive(candidate: &str) -> Attempt {
    let (value, repaired) = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => (value, false),
        Err(_) => {
            let Some(value) = try_repair_json(candidate)
                .and_then(|fixed| serde_json::from_str::<Value>(&fixed).ok())
            else {
                return Attempt::default();
            };
            (value, true)
        }
    };

    let items = match value {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => return Attempt::default(),
    };

    let mut attempt = Attempt::collect(items.iter().map(|item| {
        let obj = item.as_object()?;
        let term = find_string_field(obj, TERM_KEYS)?;
        let explanation = find_string_field(obj, EXPLANATION_KEYS)?;
        TermRecord::from_parts(term, explanation)
    }));
    attempt.repaired = repaired;
    attempt
}

/// First string value whose key, lowercased and trimmed, is in `keys`.
///
/// `keys` order wins over object order, so `term` beats `name` when both exist.
fn find_string_field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|wanted| {
        obj.iter()
            .find(|(key, value)| key.trim().eq_ignore_ascii_case(wanted) && value.is_string())
            .and_then(|(_, value)| value.as_str())
    })
}
