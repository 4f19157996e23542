//! Image reference extraction.
//!
//! Two independent pattern rules are matched against the full text:
//!
//! - double-bracket embeds: `![[pic.png]]`
//! - bracket links: `![alt](path/to/pic.png)`
//!
//! Every match produces one [`ImageReference`]; identical markup is not
//! deduplicated. Remote (`http://`, `https://`) bracket links are skipped.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use vaultpub_config::PublishConfig;

/// Raster and vector formats recognised in image references.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg"];

/// Extension of the rendered file stored next to a drawing.
const RENDERED_EXTENSION: &str = "png";

/// Result of uploading one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The asset is now served from `url`.
    Uploaded {
        /// Public URL returned by the uploader.
        url: String,
    },
    /// The upload failed and the user has been notified.
    Failed {
        /// Transport error message.
        reason: String,
    },
}

/// One matched image occurrence in a document.
///
/// Immutable after extraction except for the outcome slot, which the upload
/// step fills exactly once.
#[derive(Debug)]
pub struct ImageReference {
    display_name: String,
    resolved_path: PathBuf,
    original_span: String,
    outcome: OnceLock<UploadOutcome>,
}

impl ImageReference {
    fn new(display_name: String, resolved_path: PathBuf, original_span: &str) -> Self {
        Self {
            display_name,
            resolved_path,
            original_span: original_span.to_owned(),
            outcome: OnceLock::new(),
        }
    }

    /// Alt text, or the filename stem when the markup had none.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Vault-relative path of the local asset.
    #[must_use]
    pub fn resolved_path(&self) -> &Path {
        &self.resolved_path
    }

    /// Exact matched markup, used as the replace-all key.
    #[must_use]
    pub fn original_span(&self) -> &str {
        &self.original_span
    }

    /// Upload outcome, or `None` if the reference was never scheduled.
    #[must_use]
    pub fn outcome(&self) -> Option<&UploadOutcome> {
        self.outcome.get()
    }

    /// Remote URL if the upload succeeded.
    #[must_use]
    pub fn remote_url(&self) -> Option<&str> {
        match self.outcome.get() {
            Some(UploadOutcome::Uploaded { url }) => Some(url),
            _ => None,
        }
    }

    /// Record the upload outcome. Returns `false` if one was already set.
    pub(crate) fn settle(&self, outcome: UploadOutcome) -> bool {
        self.outcome.set(outcome).is_ok()
    }
}

/// Extracts [`ImageReference`]s from markdown text.
#[derive(Debug)]
pub struct ReferenceExtractor {
    /// `![[name.ext]]`
    embed_regex: Regex,
    /// `![alt](path.ext)`
    link_regex: Regex,
    attachment_dir: PathBuf,
    drawing_extension: Option<String>,
}

impl ReferenceExtractor {
    /// Create an extractor for the given publishing configuration.
    ///
    /// # Panics
    ///
    /// Panics if the internal patterns fail to compile. The drawing alias is
    /// escaped, so this cannot happen for any configuration value.
    #[must_use]
    pub fn new(config: &PublishConfig) -> Self {
        let mut extensions: Vec<String> =
            IMAGE_EXTENSIONS.iter().map(|e| (*e).to_owned()).collect();
        if let Some(alias) = &config.drawing_extension {
            extensions.push(regex::escape(alias));
        }
        let extensions = extensions.join("|");

        Self {
            embed_regex: Regex::new(&format!(r"!\[\[([^\]\n]*?\.(?:{extensions}))\]\]")).unwrap(),
            link_regex: Regex::new(&format!(
                r"!\[([^\]\n]*)\]\(([^)\n]*?\.(?:{extensions}))\)"
            ))
            .unwrap(),
            attachment_dir: PathBuf::from(&config.attachment_location),
            drawing_extension: config.drawing_extension.clone(),
        }
    }

    /// Extract every image reference from `text`.
    ///
    /// Double-bracket embeds come first, then bracket links, each in text order.
    #[must_use]
    pub fn extract(&self, text: &str) -> Vec<ImageReference> {
        let mut references = Vec::new();

        for caps in self.embed_regex.captures_iter(text) {
            let name = &caps[1];
            references.push(ImageReference::new(
                file_stem(name),
                self.resolve(name),
                &caps[0],
            ));
        }

        for caps in self.link_regex.captures_iter(text) {
            let raw_path = &caps[2];
            if raw_path.starts_with("http://") || raw_path.starts_with("https://") {
                continue;
            }
            let decoded = percent_decode_str(raw_path).decode_utf8_lossy();
            let alt = &caps[1];
            let display_name = if alt.is_empty() {
                file_stem(&decoded)
            } else {
                alt.to_owned()
            };
            references.push(ImageReference::new(
                display_name,
                self.resolve(&decoded),
                &caps[0],
            ));
        }

        references
    }

    /// Join a raw reference path onto the attachment directory.
    ///
    /// `.` and `..` are resolved lexically. A `..` that would climb above the
    /// vault root is kept, so storage still rejects it.
    ///
    /// Drawings are stored as a rendered sibling, so `x.excalidraw`
    /// resolves to `x.excalidraw.png`.
    fn resolve(&self, name: &str) -> PathBuf {
        let path = normalize(&self.attachment_dir.join(name));
        if self.is_drawing(name) {
            let mut os: OsString = path.into_os_string();
            os.push(".");
            os.push(RENDERED_EXTENSION);
            PathBuf::from(os)
        } else {
            path
        }
    }

    fn is_drawing(&self, name: &str) -> bool {
        self.drawing_extension
            .as_deref()
            .is_some_and(|alias| Path::new(name).extension().is_some_and(|ext| ext == alias))
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Filename without directories or the final extension.
fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
