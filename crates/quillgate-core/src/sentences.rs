//! Sentence structure analysis: average length and variety.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::text;

/// Sentence length statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SentenceStructureReport {
    /// Number of sentences found.
    pub sentence_count: usize,
    /// Mean words per sentence; 0 when there are no sentences.
    pub avg_length: f64,
    /// Whether at least one sentence deviates from the mean by more than the tolerance.
    pub has_variety: bool,
    /// Shortest sentence in words.
    pub shortest: usize,
    /// Longest sentence in words.
    pub longest: usize,
}

/// Verdict of the average-length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthVerdict {
    /// Average above the maximum.
    TooLong,
    /// Average below the minimum.
    TooShort,
    /// Within bounds.
    Appropriate,
}

impl SentenceStructureReport {
    /// Classify the average length against `[min, max]`.
    pub fn length_verdict(&self, min: f64, max: f64) -> LengthVerdict {
        if self.avg_length > max {
            LengthVerdict::TooLong
        } else if self.avg_length < min {
            LengthVerdict::TooShort
        } else {
            LengthVerdict::Appropriate
        }
    }
}

/// Analyze sentence lengths in `content`.
///
/// A sentence counts as variety when its length is below
/// `avg * (1 - tolerance)` or above `avg * (1 + tolerance)`.
#[tracing::instrument(skip(content), fields(text_len = content.len()))]
pub fn analyze_sentence_structure(content: &str, tolerance: f64) -> SentenceStructureReport {
    let lengths: Vec<usize> = text::split_sentences(content)
        .into_iter()
        .map(|s| text::sentence_word_count(s.trim()))
        .collect();

    if lengths.is_empty() {
        return SentenceStructureReport::default();
    }

    let total: usize = lengths.iter().sum();
    let avg = total as f64 / lengths.len() as f64;
    let low = avg * (1.0 - tolerance);
    let high = avg * (1.0 + tolerance);
    let has_variety = lengths.iter().any(|&l| (l as f64) < low || (l as f64) > high);

    SentenceStructureReport {
        sentence_count: lengths.len(),
        avg_length: avg,
        has_variety,
        shortest: lengths.iter().copied().min().unwrap_or(0),
        longest: lengths.iter().copied().max().unwrap_or(0),
    }
}
