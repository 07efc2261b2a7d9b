//! Error types for the circuit formats

use thiserror::Error;

/// Result type for format operations
pub type Result<T> = std::result::Result<T, FormatError>;

/// Errors raised while reading or writing a circuit document
#[derive(Error, Debug)]
pub enum FormatError {
    /// A text line could not be parsed
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source text
        line: usize,
        /// What was wrong with the line
        message: String,
    },

    /// The JSON document is not a CircuitJS document we can read
    #[error("Unsupported JSON schema: {reason}")]
    Schema {
        /// Reason the schema was rejected
        reason: String,
    },

    /// A JSON field carries a value of the wrong shape
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Dotted path of the offending field
        field: String,
        /// Description of the problem
        message: String,
    },

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FormatError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::Schema {
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
