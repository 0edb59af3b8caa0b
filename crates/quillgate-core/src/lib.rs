//! Core library for quillgate.
//!
//! Scores AI-generated blog posts with a fixed battery of deterministic
//! checks and drives the test-and-revise loop that asks a generator for a
//! rewrite when a post falls below the pass bar.
//!
//! # Modules
//!
//! - [`scoring`] - The aggregate quality score and [`QualityReport`]
//! - [`structure`], [`readability`], [`sentiment`], [`keywords`],
//!   [`sentences`], [`transitions`] - Individual checks
//! - [`prompt`] - Generation prompts
//! - [`evaluation`] - Model-as-judge prompts and reply parsing
//! - [`revision`] - The test-and-revise loop
//! - [`analytics`] - Storage records and summaries
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use quillgate_core::evaluate_content;
//!
//! let report = evaluate_content("# Hello\n\nA very short post.", "en");
//! assert!(report.score < 70.0);
//! assert!(!report.feedback.is_empty());
//! ```
#![deny(unsafe_code)]

pub mod analytics;
pub mod config;
pub mod dictionaries;
pub mod error;
pub mod evaluation;
pub mod keywords;
pub mod markdown;
pub mod prompt;
pub mod readability;
pub mod revision;
pub mod scoring;
pub mod sentences;
pub mod sentiment;
pub mod structure;
pub mod text;
pub mod transitions;

pub use config::{Config, ConfigLoader, LogLevel, ScoringConfig};
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult, GenerationError};
pub use revision::{ContentGenerator, RevisionOutcome, test_and_revise};
pub use scoring::{ContentEvaluator, QualityReport, evaluate_content};
pub use sentiment::Sentiment;

/// Default input size ceiling: 5 MiB.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;

/// Reject `content` when it is larger than `limit` bytes.
///
/// `None` disables the check.
pub fn check_input_size(content: &str, limit: Option<usize>) -> AnalysisResult<()> {
    match limit {
        Some(limit) if content.len() > limit => Err(AnalysisError::InputTooLarge {
            size: content.len(),
            limit,
        }),
        _ => Ok(()),
    }
}
