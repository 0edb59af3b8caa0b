//! Text processing utilities.
//!
//! Tokenization, sentence splitting and paragraph splitting shared by the
//! analyzers. The splitters are intentionally literal: sentences are runs of
//! text ending in terminal punctuation, paragraphs are blank-line separated
//! segments, and words are runs of word characters.

use regex::Regex;
use std::sync::LazyLock;

/// A run of non-terminal characters followed by one or more terminators.
static SENTENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("valid regex"));

/// A run of word characters.
static WORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Split text into sentences on `.`, `!` and `?` runs.
///
/// Trailing text without terminal punctuation is not a sentence.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Number of whitespace-separated words in a sentence.
pub fn sentence_word_count(sentence: &str) -> usize {
    sentence.split_whitespace().count()
}

/// Extract lowercase word tokens (runs of letters, digits and underscores).
pub fn word_tokens(text: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Split text on blank-line boundaries, keeping empty segments.
///
/// The segment count is what the paragraph check compares, so an empty
/// string is one segment and stray blank lines still count.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n").collect()
}
