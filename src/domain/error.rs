//! Error types for the Kirjastokaveri plugin.
//!
//! This module defines the centralized error type [`KaveriError`] and a type alias
//! [`Result`] used throughout the plugin. Errors are built with `thiserror`.
//!
//! None of these errors are fatal: every asynchronous failure is caught where the
//! request was issued and turned into a fallback or a toast notification.

use thiserror::Error;

/// The main error type for Kirjastokaveri operations.
///
/// # Examples
///
/// ```
/// use kirjastokaveri::KaveriError;
///
/// fn load_wishlist() -> Result<(), KaveriError> {
///     Err(KaveriError::Storage("wishlist file is locked".to_string()))
/// }
///
/// assert!(load_wishlist().is_err());
/// ```
#[derive(Debug, Error)]
pub enum KaveriError {
    /// Reading or writing the wishlist store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A theme could not be read or parsed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Communication with the background worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The library API answered with a non-success status.
    ///
    /// The body is kept (truncated) for logging; it is never shown to the user.
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Response body, truncated to a short prefix.
        body: String,
    },

    /// A JSON body could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KaveriError {
    /// Builds an [`KaveriError::Api`] from a status and raw body bytes.
    ///
    /// Only the first 200 characters of the body are retained.
    #[must_use]
    pub fn api(status: u16, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        Self::Api {
            status,
            body: text.chars().take(200).collect(),
        }
    }
}

/// A specialized `Result` type for Kirjastokaveri operations.
pub type Result<T> = std::result::Result<T, KaveriError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_truncates_body() {
        let body = "x".repeat(500);
        let err = KaveriError::api(502, body.as_bytes());
        match err {
            KaveriError::Api { status, body } => {
                assert_eq!(status, 502);
                assert_eq!(body.len(), 200);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn api_error_display_mentions_status() {
        let err = KaveriError::api(404, b"not found");
        assert_eq!(err.to_string(), "API error (status 404): not found");
    }
}
