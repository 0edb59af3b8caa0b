//! Transition word detection.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;

/// Connectives the scorer looks for.
pub const TRANSITION_WORDS: &[&str] = &[
    "however",
    "therefore",
    "furthermore",
    "moreover",
    "in addition",
    "consequently",
];

static TRANSITION_MATCHER: LazyLock<AhoCorasick> =
    LazyLock::new(|| AhoCorasick::new(TRANSITION_WORDS).expect("valid patterns"));

/// Transition words present in `content`, in list order.
///
/// Matching is a case-insensitive substring search over the whole text,
/// so "However," and "in addition to" both count.
#[tracing::instrument(skip_all, fields(text_len = content.len()))]
pub fn find_transitions(content: &str) -> Vec<&'static str> {
    let lower = content.to_lowercase();
    let mut seen = [false; TRANSITION_WORDS.len()];
    for m in TRANSITION_MATCHER.find_overlapping_iter(&lower) {
        seen[m.pattern().as_usize()] = true;
    }
    TRANSITION_WORDS
        .iter()
        .zip(seen)
        .filter_map(|(w, hit)| hit.then_some(*w))
        .collect()
}
