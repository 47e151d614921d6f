//! Error types for tanya.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific failure conditions and keeps messages uniform.
//! Row-level skip diagnostics are not errors and live with the loader.

use std::path::PathBuf;

use thiserror::Error;

/// Validation errors raised while constructing templates or configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Template question cannot be empty")]
    EmptyQuestion,

    #[error("Template answer cannot be empty")]
    EmptyAnswer,

    #[error("Similarity threshold {value} is out of range [0.0, 100.0]")]
    ThresholdOutOfRange {
        value: f32,
    },

    #[error("Score value {value} is out of range [0.0, 100.0]")]
    ScoreOutOfRange {
        value: f32,
    },

    #[error("max_matches must be at least 1")]
    ZeroMaxMatches,
}

/// Load errors raised while reading template source files.
///
/// These are file-scoped: one file failing to load never aborts the scan
/// of the remaining files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No candidate encoding could decode {path:?}")]
    Encoding {
        path: PathBuf,
    },

    #[error("{path:?} is missing required column(s): {missing}")]
    MissingColumns {
        path: PathBuf,
        missing: String,
    },

    #[error("Failed to parse {path:?}: {message}")]
    Malformed {
        path: PathBuf,
        message: String,
    },
}

/// Top-level error type for tanya.
#[derive(Debug, Error)]
pub enum TanyaError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl TanyaError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a load error.
    #[must_use]
    pub const fn is_load(&self) -> bool {
        matches!(self, Self::Load(_))
    }

    /// Returns true if this is an internal error.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

/// Result type alias for tanya operations.
pub type TanyaResult<T> = Result<T, TanyaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_threshold() {
        let err = ValidationError::ThresholdOutOfRange { value: 150.0 };
        let msg = format!("{err}");
        assert!(msg.contains("150"));
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_validation_error_empty_fields() {
        let msg = format!("{}", ValidationError::EmptyQuestion);
        assert!(msg.contains("question"));
        let msg = format!("{}", ValidationError::EmptyAnswer);
        assert!(msg.contains("answer"));
    }

    #[test]
    fn test_load_error_missing_columns() {
        let err = LoadError::MissingColumns {
            path: PathBuf::from("faq.csv"),
            missing: "question, answer".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("faq.csv"));
        assert!(msg.contains("question, answer"));
    }

    #[test]
    fn test_load_error_encoding() {
        let err = LoadError::Encoding {
            path: PathBuf::from("broken.csv"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("broken.csv"));
        assert!(msg.contains("encoding"));
    }

    #[test]
    fn test_tanya_error_from_validation() {
        let err: TanyaError = ValidationError::EmptyQuestion.into();
        assert!(err.is_validation());
        assert!(!err.is_load());
    }

    #[test]
    fn test_tanya_error_from_load() {
        let err: TanyaError = LoadError::Encoding {
            path: PathBuf::from("x.csv"),
        }
        .into();
        assert!(err.is_load());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_tanya_error_internal() {
        let err = TanyaError::internal("lock poisoned");
        assert!(err.is_internal());
        let msg = format!("{err}");
        assert!(msg.contains("lock poisoned"));
    }
}
