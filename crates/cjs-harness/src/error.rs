//! Error types for the roundtrip harness

use thiserror::Error;

/// Result type for engine calls
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors raised by a circuit engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine rejected imported data
    #[error("import failed: {reason}")]
    Import {
        /// Reason reported by the engine
        reason: String,
    },

    /// The engine could not produce an export
    #[error("export failed: {reason}")]
    Export {
        /// Reason reported by the engine
        reason: String,
    },

    /// Document format error from the in-process engine
    #[error("{0}")]
    Format(#[from] cjs_format::FormatError),

    /// The engine is not reachable or not ready
    #[error("engine unavailable: {reason}")]
    Unavailable {
        /// Reason the engine cannot be used
        reason: String,
    },
}

impl EngineError {
    /// Create an import error
    pub fn import(reason: impl Into<String>) -> Self {
        Self::Import {
            reason: reason.into(),
        }
    }

    /// Create an export error
    pub fn export(reason: impl Into<String>) -> Self {
        Self::Export {
            reason: reason.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Errors raised by the harness outside a fixture run
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A fixture could not be loaded
    #[error("could not load fixture '{name}': {reason}")]
    Load {
        /// Fixture identifier
        name: String,
        /// Why loading failed
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error while writing a report
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl HarnessError {
    /// Create a load error
    pub fn load(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::import("unexpected token");
        assert_eq!(format!("{}", err), "import failed: unexpected token");

        let err = HarnessError::load("ohms.txt", "HTTP 404");
        assert!(format!("{}", err).contains("ohms.txt"));
        assert!(format!("{}", err).contains("HTTP 404"));
    }

    #[test]
    fn format_errors_convert() {
        let err: EngineError = cjs_format::FormatError::parse(2, "bad x1").into();
        assert!(matches!(err, EngineError::Format(_)));
        assert!(err.to_string().contains("line 2"));
    }
}
