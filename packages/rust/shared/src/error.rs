//! Error types for the storefront workspace.
//!
//! Library crates use [`StorefrontError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Resolution gaps (unknown variant id, unknown branding language, missing
//! dispatcher entry) are never errors; they resolve to a documented default.

use std::path::PathBuf;

/// Top-level error type for all storefront operations.
#[derive(Debug, thiserror::Error)]
pub enum StorefrontError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching the site configuration.
    #[error("network error: {0}")]
    Network(String),

    /// Parse error (JSON body, cached snapshot, configuration source).
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (checksum mismatch, invalid template, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, StorefrontError>;

impl StorefrontError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should abort a whole batch run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = StorefrontError::config("path_template lacks {variant}");
        assert_eq!(err.to_string(), "config error: path_template lacks {variant}");

        let err = StorefrontError::validation("checksum mismatch");
        assert!(err.to_string().contains("checksum mismatch"));
    }

    #[test]
    fn only_io_is_fatal() {
        let io = StorefrontError::io(
            "variants.ts",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(io.is_fatal());
        assert!(!StorefrontError::Network("HTTP 500".into()).is_fatal());
        assert!(!StorefrontError::parse("bad json").is_fatal());
    }
}
