//! Error types for a2hs-core operations.
//!
//! None of these reach the presentation layer. The dismissal store swallows
//! storage failures and the controller reports stale use through return values.

use std::path::PathBuf;

/// All errors that can occur in a2hs-core operations.
#[derive(Debug, thiserror::Error)]
pub enum A2hsError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Unknown dismissal scope: {0}")]
    UnknownScope(String),

    #[error("Dismissal scope {0} lives in process memory and cannot be managed here")]
    ScopeNotPersisted(String),

    // ─────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using A2hsError.
pub type Result<T> = std::result::Result<T, A2hsError>;

impl A2hsError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        A2hsError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        A2hsError::Json {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_context() {
        let err = A2hsError::io(
            "reading dismissals",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error: reading dismissals: denied");
    }
}
