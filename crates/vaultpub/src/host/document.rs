//! Markdown file as the published document.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use vaultpub_core::{DocumentSource, HostError};

/// [`DocumentSource`] backed by a file on disk.
pub(crate) struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl DocumentSource for FileDocument {
    fn current_text(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(path = %self.path.display(), "Cannot read document: {e}");
                None
            }
        }
    }

    fn set_text(&self, text: &str) -> Result<(), HostError> {
        if !self.path.is_file() {
            return Ok(());
        }
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_read_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "![[pic.png]]").unwrap();
        let document = FileDocument::new(&path);

        assert_eq!(document.current_text().as_deref(), Some("![[pic.png]]"));
        document.set_text("rewritten").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "rewritten");
    }

    #[test]
    fn test_missing_file_is_inactive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.md");
        let document = FileDocument::new(&path);

        assert_eq!(document.current_text(), None);
        document.set_text("text").unwrap();
        assert!(!path.exists());
    }
}
