//! Deterministic JSON repair for common LLM output errors.
//!
//! The text is split into double-quoted string segments and "code" segments
//! (everything between strings). Each fix is a small pass over one kind of
//! segment, after which the text is re-split for the next pass. No regex.

/// Attempt to repair common LLM JSON mistakes without calling the model again.
///
/// Returns the repaired string if any fixes were applied and the result is
/// valid JSON. Returns `None` if the input was already valid or could not be
/// repaired.
///
/// Repairs applied (in order):
/// 1. Python literals outside strings: `True`, `False`, `None`
/// 2. Single-quoted strings become double-quoted
/// 3. Unquoted object keys get quoted
/// 4. Raw newlines and tabs inside strings get escaped
/// 5. An unterminated string and any unclosed `[`/`{` get closed
/// 6. Trailing commas before `]` or `}` are dropped
///
/// # Examples
///
/// ```
/// use term_extractor::output_parser::try_repair_json;
///
/// let fixed = try_repair_json("[{'term': 'LLM', 'explanation': 'A model.'},]").unwrap();
/// assert_eq!(fixed, r#"[{"term": "LLM", "explanation": "A model."}]"#);
/// ```
pub fn try_repair_json(broken: &str) -> Option<String> {
    if is_valid(broken) {
        return None;
    }

    let mut s = map_code(broken, replace_python_literals);
    s = map_code(&s, replace_single_quotes);
    s = map_code(&s, quote_unquoted_keys);
    s = escape_raw_control_chars(&s);
    s = close_unterminated(&s);
    s = map_code(&s, remove_trailing_commas);

    if is_valid(&s) {
        Some(s)
    } else {
        None
    }
}

fn is_valid(s: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(s).is_ok()
}

/// A slice of the input, either inside or outside a double-quoted string.
#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Code(&'a str),
    /// Includes the surrounding quotes; `closed` is false when the input
    /// ended before the closing quote.
    Str { text: &'a str, closed: bool },
}

fn segments(s: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                out.push(Segment::Str {
                    text: &s[start..=i],
                    closed: true,
                });
                start = i + 1;
                in_string = false;
            }
        } else if ch == '"' {
            if start < i {
                out.push(Segment::Code(&s[start..i]));
            }
            start = i;
            in_string = true;
        }
    }

    if start < s.len() {
        if in_string {
            out.push(Segment::Str {
                text: &s[start..],
                closed: false,
            });
        } else {
            out.push(Segment::Code(&s[start..]));
        }
    }
    out
}

/// Rewrite every code segment with `f`, copying string segments verbatim.
fn map_code(s: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(s.len());
    for seg in segments(s) {
        match seg {
            Segment::Code(code) => out.push_str(&f(code)),
            Segment::Str { text, .. } => out.push_str(text),
        }
    }
    out
}

fn replace_python_literals(code: &str) -> String {
    fn flush(out: &mut String, word: &mut String) {
        out.push_str(match word.as_str() {
            "True" => "true",
            "False" => "false",
            "None" => "null",
            other => other,
        });
        word.clear();
    }

    let mut out = String::with_capacity(code.len());
    let mut word = String::new();
    for ch in code.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            word.push(ch);
        } else {
            flush(&mut out, &mut word);
            out.push(ch);
        }
    }
    flush(&mut out, &mut word);
    out
}

/// Convert `'text'` to `"text"` when both quotes sit at value boundaries.
fn replace_single_quotes(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\'' && opens_value(&chars[..i]) {
            if let Some(close) = closing_single_quote(&chars, i + 1) {
                out.push('"');
                for &ch in &chars[i + 1..close] {
                    match ch {
                        '"' => out.push_str("\\\""),
                        _ => out.push(ch),
                    }
                }
                out.push('"');
                i = close + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Whether the last non-blank char before a quote can precede a value.
fn opens_value(before: &[char]) -> bool {
    match before.iter().rev().find(|c| !c.is_whitespace()) {
        None => true,
        Some(c) => matches!(c, '{' | '[' | ':' | ','),
    }
}

/// Find a `'` that is followed (after blanks) by a value terminator.
fn closing_single_quote(chars: &[char], from: usize) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '\'' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, None | Some('}' | ']' | ':' | ',')) {
                    return Some(i);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

/// `{key: 1, other: 2}` becomes `{"key": 1, "other": 2}`.
fn quote_unquoted_keys(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        out.push(ch);
        i += 1;
        if ch != '{' && ch != ',' {
            continue;
        }

        while i < chars.len() && chars[i].is_whitespace() {
            out.push(chars[i]);
            i += 1;
        }
        if i >= chars.len() || !(chars[i].is_alphabetic() || chars[i] == '_') {
            continue;
        }

        let key_start = i;
        while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
            i += 1;
        }
        let key: String = chars[key_start..i].iter().collect();

        let mut j = i;
        while j < chars.len() && chars[j].is_whitespace() {
            j += 1;
        }
        if j < chars.len() && chars[j] == ':' {
            out.push('"');
            out.push_str(&key);
            out.push('"');
        } else {
            out.push_str(&key);
        }
    }
    out
}

/// Escape literal newlines, carriage returns and tabs inside strings.
fn escape_raw_control_chars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for seg in segments(s) {
        match seg {
            Segment::Code(code) => out.push_str(code),
            Segment::Str { text, .. } => {
                for ch in text.chars() {
                    match ch {
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        _ => out.push(ch),
                    }
                }
            }
        }
    }
    out
}

/// Close a dangling string, then every bracket still open, innermost first.
fn close_unterminated(s: &str) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut dangling_string = false;

    for seg in segments(s) {
        match seg {
            Segment::Code(code) => {
                for ch in code.chars() {
                    match ch {
                        '[' => stack.push(']'),
                        '{' => stack.push('}'),
                        ']' | '}' => {
                            if stack.last() == Some(&ch) {
                                stack.pop();
                            }
                        }
                        _ => {}
                    }
                }
            }
            Segment::Str { closed, .. } => dangling_string = !closed,
        }
    }

    let mut out = s.to_string();
    if dangling_string {
        if out.ends_with('\\') {
            out.pop();
        }
        out.push('"');
    }
    out.extend(stack.iter().rev());
    out
}

fn remove_trailing_commas(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let mut out = String::with_capacity(code.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch == ',' {
            let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next, Some(']' | '}')) {
                continue;
            }
        }
        out.push(ch);
    }
    out
}
