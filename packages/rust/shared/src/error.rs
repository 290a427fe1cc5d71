//! Error types for catchlog.
//!
//! Library crates use [`CatchlogError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` and aborts on any of them.

use std::path::PathBuf;

/// Top-level error type for all catchlog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatchlogError {
    /// The report destination could not be opened, written, or flushed.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the console echo failed.
    #[error("console error: {0}")]
    Console(std::io::Error),

    /// Caller handed the reporter data it cannot render.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Snapshot parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CatchlogError>;

impl CatchlogError {
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

    /// Create an invalid-input error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CatchlogError::config("missing [output] section");
        assert_eq!(err.to_string(), "config error: missing [output] section");

        let err = CatchlogError::invalid_input("eigenvalue 3 is negative");
        assert_eq!(err.to_string(), "invalid input: eigenvalue 3 is negative");
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let err = CatchlogError::io("/missing/run.log", source);
        let shown = err.to_string();
        assert!(shown.contains("/missing/run.log"));
        assert!(shown.contains("no such directory"));
    }
}
