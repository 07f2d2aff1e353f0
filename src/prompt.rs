//! Prompt construction.
//!
//! The prompt fixes the output contract the parser is built around: a bare
//! JSON array of `{"term", "explanation"}` objects, with a sentinel record
//! when nothing was found. Models do not always comply, which is why
//! [`extract_terms`](crate::output_parser::extract_terms) exists.

use std::collections::HashMap;

/// Sentinel that should never appear in real templates.
const ESCAPE_SENTINEL: &str = "\x00LBRACE\x00";
/// Sentinel for escaped closing brace.
const ESCAPE_SENTINEL_CLOSE: &str = "\x00RBRACE\x00";

/// Default jargon-explaining prompt. `{input}` receives the user's text and
/// `{max_words}` the per-explanation word cap.
pub const EXPLAIN_TEMPLATE: &str = "You are a helpful assistant that explains AI and technology jargon in plain, simple English. \
The user copied the following text from a social media post. \
Identify every AI-related term, acronym, or technical jargon and explain each one in 1-2 simple sentences. \
IMPORTANT: Respond ONLY with a JSON array. No markdown, no asterisks, no extra text. \
Each item must have \"term\" and \"explanation\" keys. \
Example: [{{\"term\":\"LLM\",\"explanation\":\"Large Language Model. An AI program trained on massive text data to understand and generate human language.\"}}] \
If there are no AI/tech terms, return: [{{\"term\":\"No AI terms\",\"explanation\":\"No AI or technology terms were found in this text.\"}}] \
Keep each explanation under {max_words} words.

Text: {input}";

/// Default cap on explanation length, in words.
pub const DEFAULT_MAX_WORDS: u32 = 30;

/// Named values substituted into `{key}` placeholders.
#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    data: HashMap<String, String>,
}

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|s| s.as_str())
    }
}

/// Build a prompt string with variable substitution.
///
/// Replaces `{key}` placeholders in the template with values from `vars`.
/// The special `{input}` placeholder is replaced by the `input` parameter.
///
/// Use `{{` to insert a literal `{` and `}}` to insert a literal `}`.
///
/// # Example
///
/// ```
/// use term_extractor::prompt::{render, PromptVars};
///
/// let vars = PromptVars::new().insert("lang", "English");
/// let result = render("Explain {input} in {lang} as {{\"term\": ...}}", "RAG", &vars);
/// assert_eq!(result, r#"Explain RAG in English as {"term": ...}"#);
/// ```
pub fn render(template: &str, input: &str, vars: &PromptVars) -> String {
    let mut rendered = template.replace("{{", ESCAPE_SENTINEL);
    rendered = rendered.replace("}}", ESCAPE_SENTINEL_CLOSE);

    // Named vars before {input}: user text is never scanned for placeholders.
    for (key, value) in &vars.data {
        let placeholder = format!("{{{}}}", key);
        rendered = rendered.replace(&placeholder, value);
    }
    rendered = rendered.replace("{input}", input);

    rendered = rendered.replace(ESCAPE_SENTINEL, "{");
    rendered.replace(ESCAPE_SENTINEL_CLOSE, "}")
}

/// Render [`EXPLAIN_TEMPLATE`] for `text`.
pub fn explain_prompt(text: &str, max_words: u32) -> String {
    let vars = PromptVars::new().insert("max_words", max_words.to_string());
    render(EXPLAIN_TEMPLATE, text, &vars)
}
