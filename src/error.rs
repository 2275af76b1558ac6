//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI and `main` use `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`ApiError`], [`PreviewError`], [`ConfigError`],
//!   [`SessionError`]) for detailed handling at the call site
//!
//! # Example
//!
//! ```ignore
//! use music_insights::error::{Result, ResultExt};
//!
//! fn refresh(ctx: &AppContext) -> Result<()> {
//!     let session = ctx.sessions().load().with_context("loading session")?;
//!     Ok(())
//! }
//! ```

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::preview::PreviewError;
use crate::session::SessionError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote analytics API error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Preview playback error
    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session (mock authentication) error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// User supplied something we can't work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ApiError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Api(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, SessionError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Session(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_converts() {
        let err: Error = ApiError::Timeout.into();
        assert!(matches!(err, Error::Api(ApiError::Timeout)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::invalid_input("year 1800").context("while parsing arguments");
        let msg = err.to_string();
        assert!(msg.contains("while parsing arguments"));
        assert!(msg.contains("year 1800"));
    }

    #[test]
    fn test_result_ext_on_api_result() {
        let result: std::result::Result<(), ApiError> =
            Err(ApiError::NotFound("/artists/x".to_string()));
        let with_ctx = result.with_context("loading artist");
        let msg = with_ctx.unwrap_err().to_string();
        assert!(msg.contains("loading artist"));
        assert!(msg.contains("/artists/x"));
    }
}
