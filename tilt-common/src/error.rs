//! Error types for the Tilt services.

use thiserror::Error;

/// Result type alias using the Tilt error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Tilt services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request (missing/malformed field)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A downstream capability (classifier, keyword extraction, search)
    /// failed. Callers on the recommendation path recover from this locally.
    #[error("Dependency error: {0}")]
    Dependency(String),

    /// Activity store write/update failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operation timed out
    #[error("Operation timed out")]
    Timeout,

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a recoverable dependency failure.
    pub const fn is_dependency(&self) -> bool {
        matches!(self, Self::Dependency(_))
    }

    /// Check if this is an invalid-input error.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Get HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Timeout => 408,
            Self::WithContext { source, .. } => source.status_code(),
            _ => 500,
        }
    }

    /// Short machine-readable code for HTTP error bodies.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Dependency(_) => "DEPENDENCY_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::WithContext { source, .. } => source.code(),
            _ => "INTERNAL_ERROR",
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(Error::InvalidInput("test".into()).status_code(), 400);
        assert_eq!(Error::NotFound("test".into()).status_code(), 404);
        assert_eq!(Error::Dependency("test".into()).status_code(), 500);
        assert_eq!(Error::Persistence("test".into()).status_code(), 500);
        assert_eq!(Error::Internal("test".into()).status_code(), 500);
        assert_eq!(Error::Timeout.status_code(), 408);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::InvalidInput("x".into()).code(), "INVALID_INPUT");
        assert_eq!(Error::Persistence("x".into()).code(), "PERSISTENCE_ERROR");
        assert_eq!(Error::Dependency("x".into()).code(), "DEPENDENCY_ERROR");
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::Persistence("insert failed".into());
        let with_ctx = err.with_context("recording observation");
        assert!(matches!(with_ctx, Error::WithContext { .. }));
        assert_eq!(with_ctx.status_code(), 500);
        assert_eq!(with_ctx.code(), "PERSISTENCE_ERROR");
    }

    #[test]
    fn test_dependency_is_recoverable() {
        assert!(Error::Dependency("search down".into()).is_dependency());
        assert!(!Error::Internal("oops".into()).is_dependency());
    }
}
