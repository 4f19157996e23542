//! Destinations for published text.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use vaultpub_core::{HostError, OutputSink};

/// Writes the published text to stdout.
pub(crate) struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_text(&self, text: &str) -> Result<(), HostError> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

/// Writes the published text to a file.
pub(crate) struct FileSink {
    path: PathBuf,
    name: String,
}

impl FileSink {
    pub(crate) fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            name: path.display().to_string(),
        }
    }
}

impl OutputSink for FileSink {
    fn write_text(&self, text: &str) -> Result<(), HostError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
