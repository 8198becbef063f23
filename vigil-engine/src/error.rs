//! Error types for the vigil engine.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, VigilError>;

/// Errors that can occur while evaluating rules or detecting anomalies.
///
/// Rule evaluation folds these into the affected [`DataQualityCheck`]
/// (`passed = false`, `error_message` populated) instead of propagating
/// them, so a batch evaluation always runs to completion.
///
/// [`DataQualityCheck`]: crate::engine::DataQualityCheck
#[derive(Error, Debug)]
pub enum VigilError {
    /// A rule is configured in a way that cannot be evaluated.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A value could not be interpreted as the type the rule expects.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A format pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An expression could not be evaluated against the record.
    #[error("Expression evaluation failed: {0}")]
    Expression(String),

    /// An external collaborator (uniqueness store, reference store)
    /// failed or was unreachable.
    #[error("Collaborator call failed: {0}")]
    Collaborator(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic engine error with custom message.
    #[error("{0}")]
    Custom(String),
}

impl VigilError {
    /// Creates an invalid configuration error with the given message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Creates an invalid data error with the given message.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Creates an expression evaluation error with the given message.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Creates a collaborator failure error with the given message.
    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    /// Creates a custom error with the given message.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Converts serde_json errors to VigilError.
impl From<serde_json::Error> for VigilError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VigilError::invalid_config("timeliness threshold is missing");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: timeliness threshold is missing"
        );

        let err = VigilError::collaborator("uniqueness store timed out");
        assert!(err.to_string().contains("uniqueness store timed out"));
    }

    #[test]
    fn test_pattern_error_from_regex() {
        let bad = regex::Regex::new("[unclosed").unwrap_err();
        let err = VigilError::from(bad);
        assert!(matches!(err, VigilError::Pattern(_)));
        assert!(err.to_string().starts_with("Invalid pattern:"));
    }
}
