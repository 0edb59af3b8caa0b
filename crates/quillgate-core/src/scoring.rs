//! Content quality scoring.
//!
//! [`ContentEvaluator::evaluate`] runs every check in a fixed order and adds
//! up their contributions:
//!
//! | check              | points          |
//! |--------------------|-----------------|
//! | length             | 10              |
//! | paragraphs         | 10              |
//! | heading            | 10              |
//! | readability        | 0–20 (score/5)  |
//! | sentiment          | 10, always      |
//! | keyword density    | 10              |
//! | sentence length    | 10              |
//! | sentence variety   | 10              |
//! | transitions        | 10              |
//!
//! A failed check adds nothing and appends one feedback line. Evaluation
//! never fails: readability errors and estimator panics count as 0, and a
//! panic anywhere else in the pipeline degrades to [`QualityReport::failed`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_LANGUAGE, ScoringConfig};
use crate::keywords::{self, KeywordDensity};
use crate::readability::{FleschReadingEase, ReadabilityEstimator};
use crate::sentences::{self, LengthVerdict};
use crate::sentiment::{self, Sentiment};
use crate::structure;
use crate::text;
use crate::transitions;

/// Feedback when no heading was found.
pub const FEEDBACK_NO_HEADING: &str =
    "Content should include at least one heading (e.g., # Heading or <h1>Heading</h1>).";
/// Feedback when a keyword exceeds the overuse density.
pub const FEEDBACK_KEYWORD_OVERUSE: &str =
    "Some keywords appear too frequently. Consider reducing their usage for better readability.";
/// Feedback when sentences are too long on average.
pub const FEEDBACK_SENTENCES_TOO_LONG: &str =
    "Average sentence length is too long. Consider breaking up some sentences for better readability.";
/// Feedback when sentences are too short on average.
pub const FEEDBACK_SENTENCES_TOO_SHORT: &str =
    "Average sentence length is too short. Consider combining some sentences for better flow.";
/// Feedback when sentence lengths are too uniform.
pub const FEEDBACK_NO_VARIETY: &str = "Try to vary sentence length for better readability.";
/// Feedback when no transition word was found.
pub const FEEDBACK_NO_TRANSITIONS: &str =
    "Consider using transition words to improve flow between ideas.";
/// Suggestion attached to a degraded report.
pub const SUGGESTION_RETRY: &str = "Please try regenerating the content.";

/// Points for each pass/fail check.
const CHECK_POINTS: f64 = 10.0;

/// Outcome of scoring one piece of content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    /// Sum of all check contributions.
    pub score: f64,
    /// One line per failed check, in check order.
    pub feedback: Vec<String>,
    /// Improvement suggestions; empty unless the caller or the failure path fills it.
    pub suggestions: Vec<String>,
    /// Readability estimate, 0 when unmeasurable.
    pub readability_score: f64,
    /// Overall sentiment.
    pub sentiment: Sentiment,
    /// Densest words, densest first.
    #[schemars(with = "std::collections::BTreeMap<String, f64>")]
    pub keyword_density: KeywordDensity,
    /// Reserved; always empty.
    pub grammar_errors: Vec<String>,
}

impl QualityReport {
    /// The report returned when the pipeline itself broke.
    pub fn failed(reason: &str) -> Self {
        Self {
            feedback: vec![format!(
                "An error occurred while testing the content: {reason}"
            )],
            suggestions: vec![SUGGESTION_RETRY.to_string()],
            ..Self::default()
        }
    }

    /// Whether the score meets `pass_score`.
    pub fn passes(&self, pass_score: f64) -> bool {
        self.score >= pass_score
    }
}

/// Scores content with configurable thresholds and readability backend.
pub struct ContentEvaluator {
    config: ScoringConfig,
    readability: Box<dyn ReadabilityEstimator>,
}

impl std::fmt::Debug for ContentEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentEvaluator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ContentEvaluator {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl ContentEvaluator {
    /// Create an evaluator using Flesch Reading Ease for readability.
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            readability: Box::new(FleschReadingEase),
        }
    }

    /// Replace the readability backend.
    #[must_use]
    pub fn with_readability_estimator<E>(mut self, estimator: E) -> Self
    where
        E: ReadabilityEstimator + 'static,
    {
        self.readability = Box::new(estimator);
        self
    }

    /// Thresholds in use.
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `content`. Never fails.
    #[tracing::instrument(skip(self, content), fields(text_len = content.len()))]
    pub fn evaluate(&self, content: &str, language: &str) -> QualityReport {
        if language != DEFAULT_LANGUAGE {
            tracing::debug!(language, "no language-specific rules, scoring as English");
        }

        let report = contain(|| self.run_checks(content));
        tracing::debug!(
            score = report.score,
            failed_checks = report.feedback.len(),
            "content evaluated"
        );
        report
    }

    fn run_checks(&self, content: &str) -> QualityReport {
        let cfg = &self.config;
        let mut report = QualityReport::default();
        let pass_fail = |report: &mut QualityReport, passed: bool, feedback: String| {
            if passed {
                report.score += CHECK_POINTS;
            } else {
                report.feedback.push(feedback);
            }
        };

        let shape = structure::analyze_structure(content);
        pass_fail(
            &mut report,
            shape.char_count >= cfg.min_content_chars,
            format!(
                "Content is too short. Aim for at least {} characters.",
                cfg.min_content_chars
            ),
        );
        pass_fail(
            &mut report,
            shape.paragraph_count >= cfg.min_paragraphs,
            format!(
                "Content should have at least {} paragraphs for better structure.",
                cfg.min_paragraphs
            ),
        );
        pass_fail(&mut report, shape.has_heading, FEEDBACK_NO_HEADING.to_string());

        let estimate = panic::catch_unwind(AssertUnwindSafe(|| self.readability.estimate(content)));
        report.readability_score = match estimate {
            Ok(Ok(r)) if r.score.is_finite() => r.score.max(0.0),
            Ok(Ok(r)) => {
                tracing::warn!(score = r.score, "readability not finite, using 0");
                0.0
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "readability unavailable, using 0");
                0.0
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                tracing::warn!(reason = %reason, "readability estimator panicked, using 0");
                0.0
            }
        };
        if cfg.readability_divisor > 0.0 {
            report.score += (report.readability_score / cfg.readability_divisor)
                .min(cfg.readability_cap)
                .max(0.0);
        }

        report.sentiment = sentiment::analyze_sentiment(content, cfg.sentiment_threshold);
        report.score += CHECK_POINTS;

        let words = text::word_tokens(content);
        let density = keywords::analyze_keyword_density(
            &words,
            cfg.keyword_report_min_density,
            cfg.keyword_report_limit,
        );
        pass_fail(
            &mut report,
            !density.overused(cfg.keyword_overuse_density),
            FEEDBACK_KEYWORD_OVERUSE.to_string(),
        );
        report.keyword_density = density.reported;

        let sentence_report =
            sentences::analyze_sentence_structure(content, cfg.variety_tolerance);
        match sentence_report
            .length_verdict(cfg.min_avg_sentence_words, cfg.max_avg_sentence_words)
        {
            LengthVerdict::TooLong => {
                report.feedback.push(FEEDBACK_SENTENCES_TOO_LONG.to_string());
            }
            LengthVerdict::TooShort => {
                report.feedback.push(FEEDBACK_SENTENCES_TOO_SHORT.to_string());
            }
            LengthVerdict::Appropriate => report.score += CHECK_POINTS,
        }
        pass_fail(
            &mut report,
            sentence_report.has_variety,
            FEEDBACK_NO_VARIETY.to_string(),
        );

        let found = transitions::find_transitions(content);
        tracing::debug!(transitions = ?found, "transition words");
        pass_fail(
            &mut report,
            !found.is_empty(),
            FEEDBACK_NO_TRANSITIONS.to_string(),
        );

        report
    }
}

/// Score `content` with default thresholds.
///
/// `language` is accepted for forward compatibility; only English rules exist.
pub fn evaluate_content(content: &str, language: &str) -> QualityReport {
    ContentEvaluator::default().evaluate(content, language)
}

/// Run a full evaluation, turning a panic into the degraded report.
fn contain(run: impl FnOnce() -> QualityReport) -> QualityReport {
    panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        let reason = panic_message(payload.as_ref());
        tracing::error!(reason = %reason, "content evaluation failed");
        QualityReport::failed(&reason)
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown internal error".to_string())
}
