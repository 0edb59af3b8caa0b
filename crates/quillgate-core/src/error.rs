//! Error types for quillgate-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by a [`ContentGenerator`](crate::revision::ContentGenerator).
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The generator could not be started or reached.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The generator ran but reported a failure.
    #[error("generator failed: {0}")]
    Failed(String),
}

/// Errors that can occur during content analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input text is empty or has no scorable content.
    #[error("no scorable text in input")]
    EmptyInput,

    /// The input exceeds the configured size limit.
    #[error("input too large: {size} bytes (limit: {limit} bytes)")]
    InputTooLarge {
        /// Size of the rejected input in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The content generator failed during a revision pass.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;
