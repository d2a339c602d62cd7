//! Error types for sitekb.
//!
//! Library crates use [`SiteKbError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Fetch and parse failures are page-local: the crawl engine logs them,
//! records them in the crawl report, and keeps going. The only errors that
//! abort a build are configuration problems caught before the first request
//! (invalid scope regex, seed URL without a host).

use std::path::PathBuf;

/// Top-level error type for all sitekb operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteKbError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP failure while fetching a page.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Malformed URL or markup.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Snapshot store failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SiteKbError>;

impl SiteKbError {
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
        let err = SiteKbError::config("include pattern '[' is not a valid regex");
        assert_eq!(
            err.to_string(),
            "config error: include pattern '[' is not a valid regex"
        );

        let err = SiteKbError::Fetch("https://example.com/: HTTP 503".into());
        assert!(err.to_string().contains("HTTP 503"));
    }
}
