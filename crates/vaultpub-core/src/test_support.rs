//! In-memory collaborators for pipeline tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::error::{HostError, UploadError};
use crate::host::{
    DocumentLink, DocumentSource, Frontmatter, LinkIndex, LinkedDocument, Notifier, OutputSink,
};
use crate::upload::Uploader;

type UploadCall = (Vec<u8>, String, PathBuf);

/// Uploader returning `https://cdn.example/<filename>`, or a configured failure.
#[derive(Default)]
pub(crate) struct FakeUploader {
    failures: HashMap<String, String>,
    calls: Mutex<Vec<UploadCall>>,
}

impl FakeUploader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing(mut self, filename: &str, message: &str) -> Self {
        self.failures
            .insert(filename.to_owned(), message.to_owned());
        self
    }

    /// Calls sorted by path (uploads run concurrently).
    pub(crate) fn calls(&self) -> Vec<UploadCall> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort_by(|a, b| a.2.cmp(&b.2));
        calls
    }
}

impl Uploader for FakeUploader {
    fn upload(
        &self,
        data: &[u8],
        filename: &str,
        original_path: &Path,
    ) -> Result<String, UploadError> {
        self.calls.lock().unwrap().push((
            data.to_vec(),
            filename.to_owned(),
            original_path.to_path_buf(),
        ));
        match self.failures.get(filename) {
            Some(message) => Err(UploadError::new(message.clone())),
            None => Ok(format!("https://cdn.example/{filename}")),
        }
    }
}

/// Notifier that records every message.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    messages: Mutex<Vec<(String, Duration)>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<(String, Duration)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, duration: Duration) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_owned(), duration));
    }
}

/// Editable in-memory document.
pub(crate) struct MemoryDocument {
    text: RefCell<Option<String>>,
    writes: RefCell<usize>,
}

impl MemoryDocument {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: RefCell::new(Some(text.to_owned())),
            writes: RefCell::new(0),
        }
    }

    pub(crate) fn inactive() -> Self {
        Self {
            text: RefCell::new(None),
            writes: RefCell::new(0),
        }
    }

    pub(crate) fn text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    pub(crate) fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl DocumentSource for MemoryDocument {
    fn current_text(&self) -> Option<String> {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) -> Result<(), HostError> {
        let mut current = self.text.borrow_mut();
        if current.is_some() {
            *current = Some(text.to_owned());
            *self.writes.borrow_mut() += 1;
        }
        Ok(())
    }
}

/// Sink capturing the published text.
#[derive(Default)]
pub(crate) struct MemorySink {
    written: RefCell<Vec<String>>,
}

impl MemorySink {
    pub(crate) fn written(&self) -> Vec<String> {
        self.written.borrow().clone()
    }
}

impl OutputSink for MemorySink {
    fn write_text(&self, text: &str) -> Result<(), HostError> {
        self.written.borrow_mut().push(text.to_owned());
        Ok(())
    }
}

/// Link index backed by fixed tables.
#[derive(Default)]
pub(crate) struct StaticLinks {
    links: Vec<DocumentLink>,
    targets: HashMap<String, PathBuf>,
    frontmatter: HashMap<PathBuf, Frontmatter>,
}

impl StaticLinks {
    pub(crate) fn link(mut self, markup: &str, display: &str, target: &str) -> Self {
        self.links.push(DocumentLink {
            original_markup: markup.to_owned(),
            display_text: display.to_owned(),
            target: target.to_owned(),
        });
        self
    }

    pub(crate) fn document(mut self, target: &str, path: &str) -> Self {
        self.targets.insert(target.to_owned(), PathBuf::from(path));
        self
    }

    pub(crate) fn frontmatter(mut self, path: &str, fields: &[(&str, &str)]) -> Self {
        let fields: BTreeMap<String, String> = fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        self.frontmatter.insert(PathBuf::from(path), fields);
        self
    }
}

impl LinkIndex for StaticLinks {
    fn links(&self) -> Vec<DocumentLink> {
        self.links.clone()
    }

    fn resolve(&self, target: &str) -> Option<LinkedDocument> {
        self.targets
            .get(target)
            .map(|path| LinkedDocument { path: path.clone() })
    }

    fn frontmatter(&self, document: &LinkedDocument) -> Option<Frontmatter> {
        self.frontmatter.get(&document.path).cloned()
    }
}
