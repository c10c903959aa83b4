//! Typed errors for the luxury-hunter library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). None of these errors
//! ever abort a batch: analysis errors are absorbed by the extraction adapter
//! and only surface through the diagnostic sink.

use std::time::Duration;

use thiserror::Error;

/// Reasons a single image could not be analyzed.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The external analysis provider failed (network, API, parse)
    #[error("analysis provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The provider answered without a usable extraction
    #[error("analysis provider returned no output")]
    MissingOutput,

    /// The per-image timeout elapsed
    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),

    /// The input could not be turned into an encoded image
    #[error("could not decode image {label}: {reason}")]
    Decode { label: String, reason: String },

    /// The analyzer panicked while processing the image
    #[error("analyzer panicked: {0}")]
    Panicked(String),
}

impl AnalysisError {
    /// Wrap any provider error.
    pub fn provider<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Provider(Box::new(error))
    }

    pub(crate) fn decode(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            label: label.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required variable is not set
    #[error("{0} must be set")]
    Missing(&'static str),

    /// Variable is set but cannot be parsed
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Result type alias for analysis operations.
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
