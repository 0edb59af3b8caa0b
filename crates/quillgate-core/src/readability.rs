//! Readability scoring using Flesch Reading Ease.
//!
//! Formula: `206.835 - 1.015 * (words/sentences) - 84.6 * (syllables/words)`
//!
//! Higher = easier. The result is clamped to 0–100: plain conversational
//! English lands around 60–70, dense academic prose near 0.
//!
//! The content is treated as a document: article prose is extracted with
//! [`markdown::extract_prose`] before counting, so markup, code and headings
//! do not skew the statistics. Syllables come from
//! [`syllable_dict`](crate::dictionaries::syllable_dict), with a heuristic
//! for unlisted words.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionaries::syllable_dict::count_syllables;
use crate::error::{AnalysisError, AnalysisResult};
use crate::markdown;
use crate::text;

/// Result of readability analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadabilityReport {
    /// Flesch Reading Ease score, 0–100.
    pub score: f64,
    /// Number of sentences detected.
    pub sentences: usize,
    /// Number of words detected.
    pub words: usize,
    /// Total syllable count.
    pub syllables: usize,
}

/// A document-level readability capability.
///
/// Implementations return an error when the content cannot be measured;
/// the scorer treats any error as a readability of 0.
pub trait ReadabilityEstimator: Send + Sync {
    /// Estimate the readability of `content` (Markdown or HTML).
    fn estimate(&self, content: &str) -> AnalysisResult<ReadabilityReport>;
}

/// Flesch Reading Ease over the extracted article prose.
#[derive(Debug, Clone, Copy, Default)]
pub struct FleschReadingEase;

impl ReadabilityEstimator for FleschReadingEase {
    fn estimate(&self, content: &str) -> AnalysisResult<ReadabilityReport> {
        check_readability(content)
    }
}

/// Score readability of a Markdown or HTML document.
#[tracing::instrument(skip(content), fields(text_len = content.len()))]
pub fn check_readability(content: &str) -> AnalysisResult<ReadabilityReport> {
    let prose = markdown::extract_prose(content);

    let word_list: Vec<&str> = prose
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    let words = word_list.len();
    if words == 0 {
        return Err(AnalysisError::EmptyInput);
    }

    // Prose without terminal punctuation still reads as one sentence.
    let sentences = text::split_sentences(&prose).len().max(1);
    let syllables: usize = word_list.iter().map(|w| count_syllables(w)).sum();

    let words_per_sentence = words as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words as f64;
    let raw = 84.6f64.mul_add(-syllables_per_word, 1.015f64.mul_add(-words_per_sentence, 206.835));
    let score = raw.clamp(0.0, 100.0);

    tracing::debug!(raw, score, sentences, words, syllables, "readability computed");

    Ok(ReadabilityReport {
        score,
        sentences,
        words,
        syllables,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_prose_is_easy() {
        let report = check_readability("The cat sat on the mat. The dog ran fast.").unwrap();
        assert_eq!(report.sentences, 2);
        assert_eq!(report.words, 10);
        assert!(report.score > 80.0, "score was {}", report.score);
    }

    #[test]
    fn dense_prose_is_hard() {
        let text = "The implementation of the comprehensive organizational restructuring \
                    initiative necessitated the establishment of interdepartmental \
                    communication protocols that facilitated the dissemination of \
                    procedural documentation.";
        let report = check_readability(text).unwrap();
        assert!(report.score < 20.0, "score was {}", report.score);
    }

    #[test]
    fn score_is_clamped() {
        let report = check_readability("Go. Run. Eat. Sit.").unwrap();
        assert!(report.score <= 100.0);
        let report = check_readability(
            "Incomprehensibility characterizes institutionalization notwithstanding.",
        )
        .unwrap();
        assert!(report.score >= 0.0);
    }

    #[test]
    fn empty_input_errors() {
        assert!(matches!(check_readability(""), Err(AnalysisError::EmptyInput)));
        assert!(check_readability("```\ncode only\n```").is_err());
    }

    #[test]
    fn html_document_is_measured() {
        let html = "<h1>Title</h1>\n<p>The cat sat on the mat.</p>\n<p>The dog ran fast.</p>";
        let report = check_readability(html).unwrap();
        assert_eq!(report.words, 10);
    }

    #[test]
    fn unterminated_prose_is_one_sentence() {
        let report = check_readability("just some words here").unwrap();
        assert_eq!(report.sentences, 1);
    }

    #[test]
    fn dictionary_counts_feed_the_formula() {
        // "area" and "idea" are 3 syllables each; the vowel-group count would say 2
        let report = check_readability("The idea fits the area.").unwrap();
        assert_eq!(report.words, 5);
        assert_eq!(report.syllables, 9);
    }
}
