//! Error types for the errtree core library
//!
//! Normalization itself never fails. These errors cover the edges where raw
//! validator output is parsed into the crate's data model.

use thiserror::Error;

/// Main error type for errtree operations
#[derive(Error, Debug)]
pub enum Error {
    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Input that parsed but does not have the expected shape
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        context: Option<String>,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            context: None,
        }
    }

    /// Attach context to an invalid input error; other variants are returned as-is
    pub fn with_context(self, context: impl Into<String>) -> Self {
        match self {
            Self::InvalidInput { message, .. } => Self::InvalidInput {
                message,
                context: Some(context.into()),
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_input("root must be an object");
        assert_eq!(err.to_string(), "Invalid input: root must be an object");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_with_context() {
        let err = Error::invalid_input("bad node").with_context("requestValidationResult");
        match err {
            Error::InvalidInput { context, .. } => {
                assert_eq!(context.as_deref(), Some("requestValidationResult"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
