//! CLI error types.

use vaultpub_config::ConfigError;
use vaultpub_core::ProcessError;
use vaultpub_storage::StorageError;
use vaultpub_upload::HttpUploadError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Upload(#[from] HttpUploadError),

    #[error("{0}")]
    Process(#[from] ProcessError),

    #[error("{0}")]
    Validation(String),
}
