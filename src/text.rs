//! Text normalization and tokenization
//!
//! Every scorer compares normalized text, so both functions here are total
//! and return owned values that callers are free to mutate.

use std::sync::LazyLock;

use ahash::AHashSet;
use regex::Regex;

// Compile patterns once at startup; the expressions are fixed, so failure is a programming error.
static BRACKET_REFS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[\s,]*\d[\d,\s]*\]").expect("Invalid regex: bracketed references")
});

/// Greeting tokens recognized at the start of a query
pub const GREETING_TOKENS: [&str; 7] = [
    "hi",
    "hello",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Self-introduction questions that count as a bare greeting on their own
pub const BARE_INTRO_PHRASES: [&str; 1] = ["who are you"];

/// Regex alternation over [`GREETING_TOKENS`], each optionally followed by "there".
pub(crate) fn greeting_alternation() -> String {
    let mut tokens = GREETING_TOKENS.to_vec();
    // Longer alternatives first: the regex engine takes the leftmost alternative that matches.
    tokens.sort_by_key(|token| std::cmp::Reverse(token.len()));
    let alternatives: Vec<String> = tokens.iter().map(|token| regex::escape(token)).collect();
    format!("(?:{})(?: there)?", alternatives.join("|"))
}

static LEADING_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}\b\s*[:,\-]?\s*", greeting_alternation()))
        .expect("Invalid regex: leading greeting")
});

static TOKEN_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9+.#]+").expect("Invalid regex: token separators"));

/// Canonicalize raw input for comparison.
///
/// Lowercases, replaces bracketed numeric references such as `[1, 2]` with a
/// space, strips leading greetings ("hi:", "good morning -") and collapses
/// whitespace. Idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = text.to_lowercase();

    // Removing an inner group can expose an outer one ("[1[2]]"), so run to a fixpoint.
    while BRACKET_REFS.is_match(&out) {
        out = BRACKET_REFS.replace_all(&out, " ").into_owned();
    }

    out = collapse_whitespace(&out);

    while let Some(found) = LEADING_GREETING.find(&out) {
        if found.end() == 0 {
            break;
        }
        out = out[found.end()..].trim_start().to_string();
    }

    collapse_whitespace(&out)
}

/// Split normalized text into tokens of letters, digits, `+`, `.` and `#`.
///
/// Sentence-final dots are trimmed so "project." and "project" compare equal,
/// while inner dots survive ("node.js"). Never yields empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    TOKEN_SEPARATORS
        .split(&normalized)
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize into a set for overlap counting
pub fn token_set(text: &str) -> AHashSet<String> {
    tokenize(text).into_iter().collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
