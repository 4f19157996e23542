//! Error types for the publishing pipeline.
//!
//! Asset- and link-level errors are recovered locally: they are reported
//! through the [`Notifier`](crate::Notifier) and the pipeline carries on with
//! degraded output. Only [`ProcessError`] aborts a `process` call.

use std::path::PathBuf;

use vaultpub_storage::StorageError;

/// Fatal error from [`Publisher::process`](crate::Publisher::process).
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The requested action is not known.
    #[error("invalid action: {0}")]
    InvalidAction(String),

    /// Writing to the document source or output sink failed.
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

/// Error reported by a host collaborator (document source or output sink).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The host refused the operation.
    #[error("{0}")]
    Rejected(String),
}

/// Error returned by an [`Uploader`](crate::Uploader) transport.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct UploadError {
    message: String,
}

impl UploadError {
    /// Create an upload error carrying a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Per-asset failure, surfaced as a user notification.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The resolved path does not exist in storage.
    #[error(
        "Cannot locate {name} at {}, check the image path or the attachment_location setting",
        .path.display()
    )]
    Missing {
        /// Display name of the reference.
        name: String,
        /// Resolved vault-relative path.
        path: PathBuf,
    },

    /// The asset exists but could not be read.
    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        /// Resolved vault-relative path.
        path: PathBuf,
        /// Underlying storage error.
        source: StorageError,
    },

    /// The upload transport failed.
    #[error("Upload {} failed, remote server returned an error: {message}", .path.display())]
    Upload {
        /// Resolved vault-relative path.
        path: PathBuf,
        /// Transport error message.
        message: String,
    },
}

/// Per-link failure; the link is replaced by its display text.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// No document matches the link target.
    #[error("Cannot resolve linked document \"{target}\"")]
    Unresolvable {
        /// Link target as written.
        target: String,
    },

    /// The linked document has no frontmatter.
    #[error("Linked document \"{target}\" has no frontmatter")]
    MissingFrontmatter {
        /// Link target as written.
        target: String,
    },

    /// The linked document's frontmatter lacks the redirect field.
    #[error("Linked document \"{target}\" has no \"{field}\" field in its frontmatter")]
    MissingRedirectField {
        /// Link target as written.
        target: String,
        /// Redirect field name that was looked up.
        field: String,
    },
}
