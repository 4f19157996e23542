//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading vault files from the local filesystem.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::storage::{Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage rooted at a vault directory.
///
/// # Example
///
/// ```ignore
/// use std::path::{Path, PathBuf};
/// use vaultpub_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("vault"));
/// let bytes = storage.read_binary(Path::new("attachments/pic.png"))?;
/// ```
#[derive(Debug)]
pub struct FsStorage {
    /// Root directory of the vault.
    root: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate that a path doesn't escape the vault root.
    ///
    /// Rejects parent directory components (`..`) and absolute paths.
    fn validate_path(path: &Path) -> Result<(), StorageError> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if escapes {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Walk a directory recursively and collect markdown files.
    fn scan_directory(dir_path: &Path, base_path: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = fs::read_dir(dir_path) else {
            return;
        };

        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                (e, is_dir)
            })
            .collect();
        entries.sort_by_key(|(e, _)| e.file_name());

        for (entry, is_dir) in entries {
            let name = entry.file_name();
            // Hidden entries (.obsidian, .git, .trash) are never documents
            if name.to_string_lossy().starts_with('.') {
                continue;
            }

            let rel_path = base_path.join(&name);
            if is_dir {
                Self::scan_directory(&entry.path(), &rel_path, out);
            } else if rel_path.extension().is_some_and(|e| e == "md") {
                out.push(rel_path);
            }
        }
    }
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        Self::validate_path(path).is_ok() && self.root.join(path).is_file()
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root.join(path);
        fs::read(&full_path).map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))
    }

    fn read_to_string(&self, path: &Path) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.root.join(path);
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path)).with_backend(BACKEND))
    }

    fn scan_markdown(&self) -> Result<Vec<PathBuf>, StorageError> {
        if !self.root.is_dir() {
            return Err(StorageError::not_found(&self.root).with_backend(BACKEND));
        }

        let mut documents = Vec::new();
        Self::scan_directory(&self.root, Path::new(""), &mut documents);
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_vault() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("attachments")).unwrap();
        fs::create_dir_all(dir.path().join("notes/deep")).unwrap();
        fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        fs::write(dir.path().join("attachments/pic.png"), [0x89, b'P', b'N', b'G']).unwrap();
        fs::write(dir.path().join("index.md"), "# Home").unwrap();
        fs::write(dir.path().join("notes/Target.md"), "---\nurl: x\n---").unwrap();
        fs::write(dir.path().join("notes/deep/Other.md"), "body").unwrap();
        fs::write(dir.path().join(".obsidian/workspace.md"), "hidden").unwrap();
        dir
    }

    #[test]
    fn test_exists() {
        let vault = create_vault();
        let storage = FsStorage::new(vault.path().to_path_buf());

        assert!(storage.exists(Path::new("attachments/pic.png")));
        assert!(!storage.exists(Path::new("attachments/missing.png")));
        assert!(!storage.exists(Path::new("attachments")));
    }

    #[test]
    fn test_exists_rejects_traversal() {
        let vault = create_vault();
        let storage = FsStorage::new(vault.path().join("notes"));

        assert!(!storage.exists(Path::new("../index.md")));
    }

    #[test]
    fn test_read_binary() {
        let vault = create_vault();
        let storage = FsStorage::new(vault.path().to_path_buf());

        let data = storage.read_binary(Path::new("attachments/pic.png")).unwrap();
        assert_eq!(data, vec![0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_read_binary_not_found() {
        let vault = create_vault();
        let storage = FsStorage::new(vault.path().to_path_buf());

        let err = storage.read_binary(Path::new("nope.png")).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
    }

    #[test]
    fn test_read_rejects_traversal() {
        let vault = create_vault();
        let storage = FsStorage::new(vault.path().to_path_buf());

        let err = storage.read_to_string(Path::new("../etc/passwd")).unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_scan_markdown_skips_hidden() {
        let vault = create_vault();
        let storage = FsStorage::new(vault.path().to_path_buf());

        let docs = storage.scan_markdown().unwrap();
        assert_eq!(
            docs,
            vec![
                PathBuf::from("index.md"),
                PathBuf::from("notes/Target.md"),
                PathBuf::from("notes/deep/Other.md"),
            ]
        );
    }

    #[test]
    fn test_scan_markdown_missing_root() {
        let storage = FsStorage::new(PathBuf::from("/definitely/not/a/vault"));

        let err = storage.scan_markdown().unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::NotFound);
    }
}
