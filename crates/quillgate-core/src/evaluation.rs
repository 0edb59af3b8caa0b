//! Model-as-judge evaluation: prompt construction and reply parsing.
//!
//! The judge is asked for a JSON object; models often wrap it in a fenced
//! ```` ```json ```` block, so the parser looks for one before falling back to
//! the whole reply.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Feedback line used when a judge reply cannot be parsed.
pub const UNPARSEABLE_FEEDBACK: &str = "Error: Unable to parse AI response";

static JSON_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```json\n([\s\S]*?)\n```").expect("valid regex"));

/// A judge model's verdict on a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelEvaluation {
    /// Overall quality out of 100.
    pub score: f64,
    /// Strengths and weaknesses.
    #[serde(default)]
    pub feedback: Vec<String>,
    /// Improvement suggestions.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ModelEvaluation {
    /// Whether this is the placeholder produced for an unparseable reply.
    pub fn is_unparsed(&self) -> bool {
        self.feedback.len() == 1 && self.feedback[0] == UNPARSEABLE_FEEDBACK
    }
}

/// Build the judge prompt for `content`.
pub fn evaluation_prompt(content: &str) -> String {
    format!(
        "You are a professional AI content evaluator. Your task is to assess the quality of the \
blog post content provided below. Evaluate the content by considering factors such as structure, \
clarity, engagement, the effective use of headings, paragraph organization, and overall writing quality.

Please provide:
- A numerical score out of 100 representing the overall quality.
- Brief, bullet-pointed feedback as an array of strings, highlighting key strengths and weaknesses (no more than 20 words).
- Concise, bullet-pointed suggestions for improvement as an array of strings (no more than 20 words).

Your response must be valid JSON in the following format:
{{
  \"score\": number,
  \"feedback\": string[],
  \"suggestions\": string[]
}}

Blog Post Content:
{content}"
    )
}

/// Parse a judge reply. Never fails.
///
/// Unparseable replies become score 0 with [`UNPARSEABLE_FEEDBACK`] and the
/// raw reply as the only suggestion.
#[tracing::instrument(skip_all, fields(reply_len = reply.len()))]
pub fn parse_model_evaluation(reply: &str) -> ModelEvaluation {
    let body = JSON_FENCE
        .captures(reply)
        .and_then(|c| c.get(1))
        .map_or(reply, |m| m.as_str());

    match serde_json::from_str::<ModelEvaluation>(body.trim()) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            tracing::warn!(error = %e, "judge reply is not valid evaluation JSON");
            ModelEvaluation {
                score: 0.0,
                feedback: vec![UNPARSEABLE_FEEDBACK.to_string()],
                suggestions: vec![reply.to_string()],
            }
        }
    }
}
