//! Response normalization.
//!
//! Models wrap their answers in code fences, prepend apologies, or append
//! follow-up chatter. [`normalize`] cuts all of that away and leaves the
//! substring most likely to be the JSON list. [`clean_markdown`] is the
//! gentler cleanup used once the cascade stops assuming any structure.

/// Opening fence marker. A `json` language hint directly after it is
/// removed together with it, in any letter case.
const FENCE: &str = "```";
const FENCE_LANG: &str = "json";

/// Isolate the candidate list payload inside a raw LLM response.
///
/// Steps:
/// 1. Trim whitespace
/// 2. Remove every `` ```json `` (any case) and bare `` ``` `` marker
/// 3. Trim again
/// 4. Drop everything before the first `[`
/// 5. Drop everything after the last `]`
///
/// The result may be empty or not list-shaped at all. Running it twice
/// gives the same text as running it once.
///
/// # Examples
///
/// ```
/// use term_extractor::output_parser::normalize;
///
/// let raw = "Sure! Here you go:\n```JSON\n[{\"term\":\"RAG\"}]\n```\nAnything else?";
/// assert_eq!(normalize(raw), "[{\"term\":\"RAG\"}]");
/// ```
pub fn normalize(raw: &str) -> String {
    let unfenced = strip_fence_markers(raw.trim());
    let mut candidate = unfenced.trim();

    if let Some(start) = candidate.find('[') {
        candidate = &candidate[start..];
    }
    if let Some(end) = candidate.rfind(']') {
        candidate = &candidate[..=end];
    }

    candidate.to_string()
}

/// Remove code fence markers wherever they occur.
///
/// Passes repeat until the text stops shrinking.
pub fn strip_fence_markers(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = strip_fence_pass(&current);
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

fn strip_fence_pass(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];
        if rest
            .get(..FENCE_LANG.len())
            .is_some_and(|hint| hint.eq_ignore_ascii_case(FENCE_LANG))
        {
            rest = &rest[FENCE_LANG.len()..];
        }
    }
    out.push_str(rest);
    out
}

/// Strip markdown decoration from free text.
///
/// Removes fence markers, every `*` (covers `**bold**` and `*italic*`), and
/// leading `#` heading markers on each line, then trims the whole text.
///
/// # Examples
///
/// ```
/// use term_extractor::output_parser::clean_markdown;
///
/// assert_eq!(clean_markdown("## **LLM**: a model"), "LLM: a model");
/// ```
pub fn clean_markdown(text: &str) -> String {
    let unfenced = strip_fence_markers(text);
    let unstarred = unfenced.replace('*', "");

    unstarred
        .lines()
        .map(|line| {
            let body = line.trim_start();
            if body.starts_with('#') {
                body.trim_start_matches('#').trim_start()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize ──

    #[test]
    fn plain_array_untouched() {
        let input = r#"[{"term":"LLM","explanation":"A model."}]"#;
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn strips_json_fence() {
        let input = "```json\n[{\"term\":\"RAG\",\"explanation\":\"...\"}]\n```";
        assert_eq!(
            normalize(input),
            "[{\"term\":\"RAG\",\"explanation\":\"...\"}]"
        );
    }

    #[test]
    fn strips_uppercase_and_bare_fences() {
        assert_eq!(normalize("```JSON\n[1]\n```"), "[1]");
        assert_eq!(normalize("```Json [2] ```"), "[2]");
        assert_eq!(normalize("```\n[3]\n```"), "[3]");
    }

    #[test]
    fn cuts_preamble_and_trailer() {
        let input = "Sorry for the delay! [1, 2] Hope this helps.";
        assert_eq!(normalize(input), "[1, 2]");
    }

    #[test]
    fn keeps_outermost_brackets() {
        let input = "x [[1], [2]] y";
        assert_eq!(normalize(input), "[[1], [2]]");
    }

    #[test]
    fn no_brackets_returns_trimmed_text() {
        assert_eq!(normalize("  just words  "), "just words");
    }

    #[test]
    fn only_closing_bracket() {
        assert_eq!(normalize("words ] tail"), "words ]");
    }

    #[test]
    fn empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "```json\n[{\"term\":\"A\",\"explanation\":\"b\"}]\n```",
            "preamble [1] trailer",
            "no structure here",
            "``` ]",
            "`` ```json` [x]",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }

    // ── strip_fence_markers ──

    #[test]
    fn fence_in_the_middle() {
        assert_eq!(strip_fence_markers("a ```json b ``` c"), "a  b  c");
    }

    #[test]
    fn back_to_back_fences() {
        assert_eq!(strip_fence_markers("``````"), "");
        assert_eq!(strip_fence_markers("``` ```json`"), " `");
    }

    #[test]
    fn multibyte_after_fence() {
        assert_eq!(strip_fence_markers("```é"), "é");
    }

    // ── clean_markdown ──

    #[test]
    fn clean_strips_emphasis_and_headings() {
        let input = "# Terms\n**LLM**: a *large* model";
        assert_eq!(clean_markdown(input), "Terms\nLLM: a large model");
    }

    #[test]
    fn clean_keeps_inline_hash() {
        assert_eq!(clean_markdown("C#: a language"), "C#: a language");
    }

    #[test]
    fn clean_strips_fences() {
        assert_eq!(clean_markdown("```\nhello\n```"), "hello");
    }
}
