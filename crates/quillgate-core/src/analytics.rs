//! Persistence records and aggregate statistics for quality reports.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scoring::QualityReport;

/// Flat, storage-friendly form of a [`QualityReport`].
///
/// Collection fields are stored as JSON text so the record fits a single
/// table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredTestResult {
    /// Post the report belongs to.
    pub blog_post_id: u64,
    /// Total score.
    pub score: f64,
    /// Readability estimate.
    pub readability_score: f64,
    /// Sentiment label.
    pub sentiment: String,
    /// JSON object text.
    pub keyword_density: String,
    /// JSON array text.
    pub grammar_errors: String,
    /// JSON array text.
    pub feedback: String,
    /// JSON array text.
    pub suggestions: String,
}

impl StoredTestResult {
    /// Flatten `report` for storage under `blog_post_id`.
    pub fn from_report(blog_post_id: u64, report: &QualityReport) -> serde_json::Result<Self> {
        Ok(Self {
            blog_post_id,
            score: report.score,
            readability_score: report.readability_score,
            sentiment: report.sentiment.to_string(),
            keyword_density: serde_json::to_string(&report.keyword_density)?,
            grammar_errors: serde_json::to_string(&report.grammar_errors)?,
            feedback: serde_json::to_string(&report.feedback)?,
            suggestions: serde_json::to_string(&report.suggestions)?,
        })
    }

    /// Decode the stored feedback lines.
    pub fn feedback_lines(&self) -> serde_json::Result<Vec<String>> {
        serde_json::from_str(&self.feedback)
    }
}

/// Aggregate view over many reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Number of reports summarized.
    pub count: usize,
    /// Mean total score.
    pub average_score: f64,
    /// Mean readability score.
    pub average_readability_score: f64,
    /// How often each feedback line occurred.
    pub common_feedback: BTreeMap<String, usize>,
}

impl AnalyticsSummary {
    /// Feedback lines ordered by frequency, most common first.
    pub fn top_feedback(&self) -> Vec<(&str, usize)> {
        let mut top: Vec<(&str, usize)> = self
            .common_feedback
            .iter()
            .map(|(line, n)| (line.as_str(), *n))
            .collect();
        top.sort_by(|a, b| b.1.cmp(&a.1));
        top
    }
}

/// Summarize `reports`. An empty slice gives an all-zero summary.
pub fn summarize(reports: &[QualityReport]) -> AnalyticsSummary {
    if reports.is_empty() {
        return AnalyticsSummary::default();
    }

    let n = reports.len() as f64;
    let mut common_feedback = BTreeMap::new();
    for line in reports.iter().flat_map(|r| &r.feedback) {
        if !line.is_empty() {
            *common_feedback.entry(line.clone()).or_insert(0) += 1;
        }
    }

    AnalyticsSummary {
        count: reports.len(),
        average_score: reports.iter().map(|r| r.score).sum::<f64>() / n,
        average_readability_score: reports.iter().map(|r| r.readability_score).sum::<f64>() / n,
        common_feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::evaluate_content;
    use crate::sentiment::Sentiment;

    fn report(score: f64, readability: f64, feedback: &[&str]) -> QualityReport {
        QualityReport {
            score,
            readability_score: readability,
            feedback: feedback.iter().map(|s| (*s).to_string()).collect(),
            ..QualityReport::default()
        }
    }

    #[test]
    fn empty_summary_is_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.average_readability_score, 0.0);
        assert!(summary.common_feedback.is_empty());
    }

    #[test]
    fn averages_and_counts() {
        let reports = vec![
            report(60.0, 40.0, &["too short", "no heading"]),
            report(80.0, 60.0, &["too short"]),
        ];
        let summary = summarize(&reports);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average_score, 70.0);
        assert_eq!(summary.average_readability_score, 50.0);
        assert_eq!(summary.common_feedback["too short"], 2);
        assert_eq!(summary.top_feedback()[0], ("too short", 2));
    }

    #[test]
    fn stored_result_encodes_collections_as_json() {
        let report = evaluate_content("# Title\n\nSome text here.", "en");
        let stored = StoredTestResult::from_report(7, &report).unwrap();
        assert_eq!(stored.blog_post_id, 7);
        assert_eq!(stored.grammar_errors, "[]");
        assert_eq!(stored.sentiment, Sentiment::Neutral.to_string());
        assert!(stored.keyword_density.starts_with('{'));
        assert_eq!(stored.feedback_lines().unwrap(), report.feedback);
    }
}
