//! Shared error types for the application
//!
//! Statistical edge cases are never errors: they come back as
//! [`Statistic`](super::Statistic) values. This type covers structurally
//! invalid input and the I/O at the edges.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for concordance operations
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed table shape (ragged rows, fewer than two raters, ...)
    #[error("Structure error: {0}")]
    Structure(String),

    /// A rating was supplied for a variable the schema does not declare
    #[error("Variable '{0}' has no declared type in the schema")]
    UndeclaredVariable(String),

    /// A rater name that is not part of the table
    #[error("Unknown rater: {0}")]
    UnknownRater(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Rater input that could not be loaded
    #[error("Input error in {path}: {message}")]
    Input { path: PathBuf, message: String },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// CSV errors
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create an input error tied to a path
    pub fn input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Input {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_prefixes_message() {
        let err: Result<()> = Err(Error::UnknownRater("Human".into()));
        let err = err.context("selecting raters").unwrap_err();
        assert_eq!(err.to_string(), "selecting raters: Unknown rater: Human");
    }

    #[test]
    fn test_input_error_mentions_path() {
        let err = Error::input("results/VG1.json", "not an object");
        assert!(err.to_string().contains("results/VG1.json"));
    }
}
