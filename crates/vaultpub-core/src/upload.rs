//! Asset resolution and concurrent upload.
//!
//! References are checked and read in extraction order. The first missing
//! asset stops scheduling; everything read before it is still uploaded.
//! Uploads run on the rayon pool and every one settles its reference's
//! outcome slot, so the join always completes.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};
use vaultpub_storage::Storage;

use crate::error::{AssetError, UploadError};
use crate::host::{NOTICE_ERROR, Notifier};
use crate::reference::{ImageReference, UploadOutcome};

/// Upload transport.
///
/// Shared across the upload pool, hence `Send + Sync`.
pub trait Uploader: Send + Sync {
    /// Upload `data` and return its public URL.
    ///
    /// `filename` is the asset's file name; `original_path` is its
    /// vault-relative path, for transports that key uploads by source.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError`] with a human-readable message on failure.
    fn upload(&self, data: &[u8], filename: &str, original_path: &Path)
    -> Result<String, UploadError>;
}

/// Counts from one upload pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UploadSummary {
    /// Uploads handed to the transport.
    pub scheduled: usize,
    /// Uploads that returned a URL.
    pub uploaded: usize,
    /// Uploads that failed.
    pub failed: usize,
    /// Asset that stopped scheduling, if any.
    pub aborted_at: Option<PathBuf>,
}

/// An asset read from storage, waiting for upload.
struct PendingUpload<'r> {
    reference: &'r ImageReference,
    filename: String,
    data: Vec<u8>,
}

/// Resolve, read and upload every reference.
pub(crate) fn upload_all(
    references: &[ImageReference],
    storage: &dyn Storage,
    uploader: &dyn Uploader,
    notifier: &dyn Notifier,
) -> UploadSummary {
    let mut summary = UploadSummary::default();
    let mut pending = Vec::with_capacity(references.len());

    for reference in references {
        match read_asset(reference, storage) {
            Ok(data) => pending.push(PendingUpload {
                reference,
                filename: upload_filename(reference.resolved_path()),
                data,
            }),
            Err(error) => {
                warn!(path = %reference.resolved_path().display(), "{error}");
                notifier.notify(&error.to_string(), NOTICE_ERROR);
                summary.aborted_at = Some(reference.resolved_path().to_path_buf());
                break;
            }
        }
    }

    summary.scheduled = pending.len();

    pending
        .par_iter()
        .for_each(|upload| upload_one(upload, uploader, notifier));

    for upload in &pending {
        match upload.reference.outcome() {
            Some(UploadOutcome::Uploaded { .. }) => summary.uploaded += 1,
            Some(UploadOutcome::Failed { .. }) | None => summary.failed += 1,
        }
    }

    summary
}

fn read_asset(reference: &ImageReference, storage: &dyn Storage) -> Result<Vec<u8>, AssetError> {
    let path = reference.resolved_path();
    if !storage.exists(path) {
        return Err(AssetError::Missing {
            name: reference.display_name().to_owned(),
            path: path.to_path_buf(),
        });
    }
    storage
        .read_binary(path)
        .map_err(|source| AssetError::Unreadable {
            path: path.to_path_buf(),
            source,
        })
}

fn upload_one(upload: &PendingUpload<'_>, uploader: &dyn Uploader, notifier: &dyn Notifier) {
    let path = upload.reference.resolved_path();
    let outcome = match uploader.upload(&upload.data, &upload.filename, path) {
        Ok(url) => {
            info!(path = %path.display(), %url, "Uploaded image");
            UploadOutcome::Uploaded { url }
        }
        Err(e) => {
            let error = AssetError::Upload {
                path: path.to_path_buf(),
                message: e.message().to_owned(),
            };
            warn!("{error}");
            notifier.notify(&error.to_string(), NOTICE_ERROR);
            UploadOutcome::Failed {
                reason: e.message().to_owned(),
            }
        }
    };
    upload.reference.settle(outcome);
}

/// File name handed to the transport.
fn upload_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image.png")
        .to_owned()
}
