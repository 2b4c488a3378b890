//! Error types for comment-scrub

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for comment-scrub
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Authentication against the platform failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level HTTP error
    #[error("HTTP error: {0}")]
    Http(String),

    /// Platform rejected the request
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Platform accepted the request but refused the action
    #[error("Rejected by platform: {0}")]
    Rejected(String),

    /// Platform asked us to slow down
    #[error("Rate limited by platform: {0}")]
    RateLimited(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Comment no longer exists on the platform
    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ScrubError>,
    },
}

impl ScrubError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ScrubError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether a retry of the same call could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ScrubError::Http(_) | ScrubError::RateLimited(_) => true,
            ScrubError::Api { status, .. } => *status >= 500,
            ScrubError::WithContext { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Toml(err.to_string())
    }
}

/// Result type alias for comment-scrub
pub type Result<T> = std::result::Result<T, ScrubError>;
