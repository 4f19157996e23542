//! Error types for the HTTP uploader.

use vaultpub_core::UploadError;

/// Error from an HTTP upload.
#[derive(Debug, thiserror::Error)]
pub enum HttpUploadError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// The response body is not JSON.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// The response has no string at the configured pointer.
    #[error("no URL at {pointer} in response: {body}")]
    MissingUrl {
        /// JSON pointer that was looked up.
        pointer: String,
        /// Response body.
        body: String,
    },

    /// No endpoint is configured.
    #[error("uploader endpoint not configured")]
    MissingEndpoint,
}

impl From<HttpUploadError> for UploadError {
    fn from(err: HttpUploadError) -> Self {
        UploadError::new(err.to_string())
    }
}
