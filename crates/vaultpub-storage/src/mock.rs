//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Mock storage for testing.
///
/// Stores files in memory and records every binary read. Use the builder
/// methods to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use vaultpub_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("attachments/pic.png", b"png-bytes".to_vec())
///     .with_text("notes/Target.md", "---\nurl: https://example.com\n---");
///
/// assert!(storage.exists(Path::new("attachments/pic.png")));
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    reads: RwLock<Vec<PathBuf>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binary file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        self.files.write().unwrap().insert(path.into(), data.into());
        self
    }

    /// Add a text file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_text(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.with_file(path, content.into().into_bytes())
    }

    /// Paths passed to [`Storage::read_binary`], in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.read().unwrap().clone()
    }

    fn not_found(path: &Path) -> StorageError {
        StorageError::new(StorageErrorKind::NotFound)
            .with_path(path)
            .with_backend("Mock")
    }
}

impl Storage for MockStorage {
    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.reads.write().unwrap().push(path.to_path_buf());
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn read_to_string(&self, path: &Path) -> Result<String, StorageError> {
        let files = self.files.read().unwrap();
        let data = files.get(path).ok_or_else(|| Self::not_found(path))?;
        String::from_utf8(data.clone()).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidData)
                .with_path(path)
                .with_backend("Mock")
                .with_source(e)
        })
    }

    fn scan_markdown(&self) -> Result<Vec<PathBuf>, StorageError> {
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|p| p.extension().is_some_and(|e| e == "md"))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_exists_and_read() {
        let storage = MockStorage::new().with_file("a/pic.png", vec![1, 2, 3]);

        assert!(storage.exists(Path::new("a/pic.png")));
        assert!(!storage.exists(Path::new("a/other.png")));
        assert_eq!(storage.read_binary(Path::new("a/pic.png")).unwrap(), vec![1, 2, 3]);
        assert_eq!(storage.reads(), vec![PathBuf::from("a/pic.png")]);
    }

    #[test]
    fn test_mock_read_missing() {
        let storage = MockStorage::new();

        let err = storage.read_binary(Path::new("missing.png")).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_mock_read_to_string_invalid_utf8() {
        let storage = MockStorage::new().with_file("bad.md", vec![0xff, 0xfe]);

        let err = storage.read_to_string(Path::new("bad.md")).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidData);
    }

    #[test]
    fn test_mock_scan_markdown() {
        let storage = MockStorage::new()
            .with_text("b.md", "")
            .with_text("a.md", "")
            .with_file("pic.png", vec![0]);

        assert_eq!(
            storage.scan_markdown().unwrap(),
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")]
        );
    }
}
