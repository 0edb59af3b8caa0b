//! Test-and-revise loop.
//!
//! Score a post; if it falls below the pass bar, ask a [`ContentGenerator`]
//! for one rewrite that addresses the feedback and score that too. There is
//! exactly one revision attempt per call.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisResult, GenerationError};
use crate::scoring::{ContentEvaluator, QualityReport};

/// Something that turns a prompt into content, typically a language model.
pub trait ContentGenerator {
    /// Produce content for `prompt`.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<F> ContentGenerator for F
where
    F: Fn(&str) -> Result<String, GenerationError>,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self(prompt)
    }
}

/// Result of [`test_and_revise`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionOutcome {
    /// Report for the content as submitted.
    pub original_report: QualityReport,
    /// The rewrite, when one was requested and came back non-blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_content: Option<String>,
    /// Report for the rewrite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revised_report: Option<QualityReport>,
}

impl RevisionOutcome {
    /// Whether a rewrite was produced.
    pub const fn revised(&self) -> bool {
        self.revised_content.is_some()
    }

    /// The report that best describes the final content.
    pub fn final_report(&self) -> &QualityReport {
        self.revised_report.as_ref().unwrap_or(&self.original_report)
    }
}

/// Build the rewrite request for `content` given its `report`.
pub fn revision_prompt(report: &QualityReport, content: &str) -> String {
    let mut prompt =
        String::from("Please revise the following blog post to address these issues:\n");
    for line in report.feedback.iter().chain(&report.suggestions) {
        prompt.push_str(line);
        prompt.push('\n');
    }
    prompt.push_str("\nOriginal content:\n");
    prompt.push_str(content);
    prompt
}

/// Score `content` and, if it scores below `pass_score`, request and score a
/// single rewrite.
///
/// Generator failures propagate; a blank rewrite counts as no revision.
#[tracing::instrument(skip_all, fields(text_len = content.len(), pass_score = pass_score))]
pub fn test_and_revise<G>(
    evaluator: &ContentEvaluator,
    generator: &G,
    content: &str,
    language: &str,
    pass_score: f64,
) -> AnalysisResult<RevisionOutcome>
where
    G: ContentGenerator + ?Sized,
{
    let original_report = evaluator.evaluate(content, language);
    let mut outcome = RevisionOutcome {
        original_report,
        revised_content: None,
        revised_report: None,
    };

    if outcome.original_report.passes(pass_score) {
        tracing::debug!(score = outcome.original_report.score, "content passes, no revision");
        return Ok(outcome);
    }

    tracing::info!(
        score = outcome.original_report.score,
        "low score, requesting revision"
    );
    let prompt = revision_prompt(&outcome.original_report, content);
    let revised = generator.generate(&prompt)?;

    if revised.trim().is_empty() {
        tracing::warn!("generator returned blank content, keeping original");
        return Ok(outcome);
    }

    let revised_report = evaluator.evaluate(&revised, language);
    tracing::info!(
        before = outcome.original_report.score,
        after = revised_report.score,
        "content revised and re-tested"
    );
    outcome.revised_content = Some(revised);
    outcome.revised_report = Some(revised_report);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::error::AnalysisError;

    const STRONG_POST: &str = "# Why Small Teams Ship Faster\n\n\
        Small teams often move quickly because every person understands the whole product and its users. \
        Decisions happen in a single conversation.\n\n\
        However, speed brings its own risks when nobody writes anything down for people who join later. \
        Knowledge leaks away quietly.\n\n\
        Therefore, good small crews keep short notes, review each change together, and share what they learn every week. \
        It works.";

    struct Recording {
        reply: String,
        calls: Cell<usize>,
        last_prompt: RefCell<String>,
    }

    impl Recording {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: Cell::new(0),
                last_prompt: RefCell::new(String::new()),
            }
        }
    }

    impl ContentGenerator for Recording {
        fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
            self.calls.set(self.calls.get() + 1);
            *self.last_prompt.borrow_mut() = prompt.to_string();
            Ok(self.reply.clone())
        }
    }

    #[test]
    fn passing_content_skips_generator() {
        let generator = Recording::new("unused");
        let outcome = test_and_revise(
            &ContentEvaluator::default(),
            &generator,
            "short",
            "en",
            0.0,
        )
        .unwrap();
        assert_eq!(generator.calls.get(), 0);
        assert!(!outcome.revised());
        assert_eq!(outcome.final_report(), &outcome.original_report);
    }

    #[test]
    fn failing_content_is_revised_once() {
        let generator = Recording::new(STRONG_POST);
        let outcome = test_and_revise(
            &ContentEvaluator::default(),
            &generator,
            "too short",
            "en",
            70.0,
        )
        .unwrap();
        assert_eq!(generator.calls.get(), 1);
        assert_eq!(outcome.revised_content.as_deref(), Some(STRONG_POST));
        let revised = outcome.revised_report.as_ref().unwrap();
        assert!(revised.score > outcome.original_report.score);
        assert_eq!(outcome.final_report(), revised);
    }

    #[test]
    fn prompt_carries_feedback_and_content() {
        let generator = Recording::new("rewrite");
        test_and_revise(&ContentEvaluator::default(), &generator, "too short", "en", 70.0)
            .unwrap();
        let prompt = generator.last_prompt.borrow();
        assert!(prompt.starts_with("Please revise the following blog post"));
        assert!(prompt.contains("Content is too short."));
        assert!(prompt.ends_with("Original content:\ntoo short"));
    }

    #[test]
    fn blank_rewrite_is_ignored() {
        let generator = Recording::new("  \n ");
        let outcome = test_and_revise(&ContentEvaluator::default(), &generator, "x", "en", 70.0)
            .unwrap();
        assert_eq!(generator.calls.get(), 1);
        assert!(!outcome.revised());
        assert!(outcome.revised_report.is_none());
    }

    #[test]
    fn generator_error_propagates() {
        let failing = |_: &str| -> Result<String, GenerationError> {
            Err(GenerationError::Unavailable("no model".to_string()))
        };
        let err = test_and_revise(&ContentEvaluator::default(), &failing, "x", "en", 70.0)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Generation(_)));
        assert!(err.to_string().contains("no model"));
    }

    #[test]
    fn revision_prompt_layout() {
        let report = QualityReport {
            feedback: vec!["A".to_string(), "B".to_string()],
            suggestions: vec!["C".to_string()],
            ..QualityReport::default()
        };
        assert_eq!(
            revision_prompt(&report, "body"),
            "Please revise the following blog post to address these issues:\nA\nB\nC\n\nOriginal content:\nbody"
        );
    }

    #[test]
    fn outcome_omits_missing_revision_in_json() {
        let outcome = RevisionOutcome {
            original_report: QualityReport::default(),
            revised_content: None,
            revised_report: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("originalReport").is_some());
        assert!(json.get("revisedContent").is_none());
    }
}
