//! Markdown cleanup for generative-model replies.
//!
//! The chat surfaces render plain text, so emphasis markers, list bullets and
//! runs of blank lines are stripped before a generated answer is shown.

use regex::Regex;
use std::sync::LazyLock;

// NOTE: expect() is acceptable here, the patterns are compile-time constants.
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid regex: bold marker"));

static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("Invalid regex: italic marker"));

// Any run of bullets ("-", "*", "+") or ordinals ("1.") at the start of a line,
// each followed by horizontal whitespace or the end of the line.
static LIST_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[^\S\n]*(?:(?:[-*+]|\d+\.)(?:[^\S\n]+|$))*")
        .expect("Invalid regex: list markers")
});

// Three or more newlines, counting whitespace-only lines as blank.
static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n(?:[^\S\n]*\n){2,}").expect("Invalid regex: excess newlines")
});

/// Strips markdown artifacts from generated text. Idempotent.
pub fn clean(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = LIST_MARKERS.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");

    text.split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
