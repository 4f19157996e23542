//! Collaborator interfaces injected into the [`Publisher`](crate::Publisher).
//!
//! The pipeline never reaches into global state: the editing host, the link
//! metadata, notifications and the output sink are all passed in at
//! construction time.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::HostError;

/// How long error notifications stay visible.
pub const NOTICE_ERROR: Duration = Duration::from_secs(10);

/// How long informational notifications stay visible.
pub const NOTICE_INFO: Duration = Duration::from_secs(5);

/// Frontmatter of a linked document, flattened to string values.
pub type Frontmatter = BTreeMap<String, String>;

/// The document being published.
pub trait DocumentSource {
    /// Current text of the active document, or `None` if there is none.
    fn current_text(&self) -> Option<String>;

    /// Overwrite the active document. A no-op if there is no active document.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the document cannot be written.
    fn set_text(&self, text: &str) -> Result<(), HostError>;
}

/// Destination for the published text (the clipboard in an editor host).
pub trait OutputSink {
    /// Write the final text.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the sink cannot be written.
    fn write_text(&self, text: &str) -> Result<(), HostError>;

    /// Short name used in the success notification.
    fn name(&self) -> &str {
        "clipboard"
    }
}

/// User-facing notifications.
///
/// Called from upload worker threads, hence `Send + Sync`.
pub trait Notifier: Send + Sync {
    /// Show `message` for roughly `duration`.
    fn notify(&self, message: &str, duration: Duration);
}

/// A cross-document link recorded in the active document's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    /// Exact markup as it appears in the text (e.g. `[[Target|alias]]`).
    pub original_markup: String,
    /// Text shown to readers (alias, or the target name).
    pub display_text: String,
    /// Link target as written (e.g. `Target`, `notes/Target.md`).
    pub target: String,
}

/// Handle to a document a link resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedDocument {
    /// Vault-relative path of the document.
    pub path: PathBuf,
}

/// Link metadata for the active document.
pub trait LinkIndex {
    /// Links found in the active document, in document order.
    fn links(&self) -> Vec<DocumentLink>;

    /// Resolve a link target to a document.
    fn resolve(&self, target: &str) -> Option<LinkedDocument>;

    /// Frontmatter of a document, or `None` if it has none.
    fn frontmatter(&self, document: &LinkedDocument) -> Option<Frontmatter>;
}
