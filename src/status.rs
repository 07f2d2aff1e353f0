//! Sentinel records for outcomes that never reach the parser.
//!
//! When the provider rejects a request, or there is no API key to send, the
//! caller still gets a [`TermList`] it can show: one record naming what went
//! wrong. This is a flat table, not part of the extraction cascade.

use crate::output_parser::PARSE_FAILURE_NOTICE;
use crate::record::{TermList, TermRecord};

pub const ERROR_TERM: &str = "Error";
pub const RATE_LIMIT_TERM: &str = "Rate Limit";

/// Map a non-success HTTP status to its sentinel record.
///
/// Returns `None` for 2xx statuses, which go through the parser instead.
///
/// # Examples
///
/// ```
/// use term_extractor::status::sentinel_for_status;
///
/// assert_eq!(sentinel_for_status(429).unwrap().first().term(), "Rate Limit");
/// assert!(sentinel_for_status(200).is_none());
/// ```
pub fn sentinel_for_status(status: u16) -> Option<TermList> {
    let record = match status {
        200..=299 => return None,
        400 => TermRecord::new(ERROR_TERM, "Invalid request. Check your API key."),
        401 | 403 => TermRecord::new(ERROR_TERM, "Authentication failed. Check your API key."),
        429 => TermRecord::new(
            RATE_LIMIT_TERM,
            "Too many requests. Free tier allows ~15/min. Wait a moment.",
        ),
        other => TermRecord::new(ERROR_TERM, format!("API Error (HTTP {}). Try again.", other)),
    };
    Some(TermList::single(record))
}

/// Sentinel returned when no usable API key is configured.
pub fn missing_api_key() -> TermList {
    TermList::single(TermRecord::new(
        ERROR_TERM,
        "No API key configured. Set GEMINI_API_KEY.",
    ))
}

/// Sentinel returned when a 2xx response has no text where the provider
/// normally puts it.
pub fn unreadable_response() -> TermList {
    TermList::single(TermRecord::new(ERROR_TERM, PARSE_FAILURE_NOTICE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(status: u16) -> (String, String) {
        let list = sentinel_for_status(status).unwrap();
        let r = list.first();
        (r.term().to_string(), r.explanation().to_string())
    }

    #[test]
    fn success_passes_through() {
        assert!(sentinel_for_status(200).is_none());
        assert!(sentinel_for_status(204).is_none());
    }

    #[test]
    fn bad_request() {
        assert_eq!(
            pair(400),
            ("Error".into(), "Invalid request. Check your API key.".into())
        );
    }

    #[test]
    fn auth_failures_share_a_message() {
        assert_eq!(pair(401), pair(403));
        assert_eq!(pair(401).1, "Authentication failed. Check your API key.");
    }

    #[test]
    fn rate_limited() {
        assert_eq!(pair(429).0, "Rate Limit");
    }

    #[test]
    fn other_statuses_include_code() {
        assert_eq!(pair(503).1, "API Error (HTTP 503). Try again.");
        assert_eq!(pair(302).0, "Error");
    }

    #[test]
    fn always_single_record() {
        for status in [400, 401, 403, 429, 500] {
            assert_eq!(sentinel_for_status(status).unwrap().len(), 1);
        }
        assert_eq!(missing_api_key().len(), 1);
        assert_eq!(unreadable_response().first().term(), "Error");
    }
}
