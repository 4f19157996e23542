//! Publishing pipeline entry point.

use std::fmt;
use std::str::FromStr;

use tracing::info;
use vaultpub_config::PublishConfig;
use vaultpub_storage::Storage;

use crate::error::ProcessError;
use crate::host::{DocumentSource, LinkIndex, NOTICE_INFO, Notifier, OutputSink};
use crate::links::{LinkSummary, resolve_links};
use crate::reference::ReferenceExtractor;
use crate::rewrite::{AltTextStyle, rewrite_images};
use crate::upload::{UploadSummary, Uploader, upload_all};

/// What to do with the rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write the text to the output sink.
    Publish,
    /// Overwrite the source document.
    Replace,
}

impl FromStr for Action {
    type Err = ProcessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLISH" => Ok(Self::Publish),
            "REPLACE" => Ok(Self::Replace),
            other => Err(ProcessError::InvalidAction(other.to_owned())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Publish => f.write_str("PUBLISH"),
            Self::Replace => f.write_str("REPLACE"),
        }
    }
}

/// Host collaborators used by a [`Publisher`].
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    /// Document being published.
    pub document: &'a dyn DocumentSource,
    /// Vault storage holding the image assets.
    pub storage: &'a dyn Storage,
    /// Upload transport.
    pub uploader: &'a dyn Uploader,
    /// Link metadata for the document.
    pub links: &'a dyn LinkIndex,
    /// User notifications.
    pub notifier: &'a dyn Notifier,
    /// Destination for [`Action::Publish`].
    pub sink: &'a dyn OutputSink,
}

/// Result of a successful [`Publisher::process`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    /// Action performed.
    pub action: Action,
    /// Final rewritten text.
    pub text: String,
    /// Image references found.
    pub references: usize,
    /// Upload counts.
    pub uploads: UploadSummary,
    /// Image occurrences replaced with remote URLs.
    pub images_rewritten: usize,
    /// Link counts.
    pub links: LinkSummary,
    /// Whether the source document was overwritten.
    pub committed: bool,
}

/// Rewrites a document's local images and internal links for publishing.
pub struct Publisher<'a> {
    config: PublishConfig,
    extractor: ReferenceExtractor,
    host: Collaborators<'a>,
}

impl<'a> Publisher<'a> {
    /// Create a publisher.
    #[must_use]
    pub fn new(config: PublishConfig, host: Collaborators<'a>) -> Self {
        let extractor = ReferenceExtractor::new(&config);
        Self {
            config,
            extractor,
            host,
        }
    }

    /// Run the pipeline and perform `action`.
    ///
    /// Missing assets, failed uploads and broken links are reported through
    /// the notifier and leave the affected markup in a degraded but valid
    /// state; they do not fail the call.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `action` is not `PUBLISH` or `REPLACE` (nothing is read or written)
    /// - the document or the output sink cannot be written
    pub fn process(&self, action: &str) -> Result<PublishReport, ProcessError> {
        let action: Action = action.parse()?;
        let host = self.host;

        let text = host.document.current_text().unwrap_or_default();

        let references = self.extractor.extract(&text);
        info!(count = references.len(), "Found image references");

        let uploads = upload_all(&references, host.storage, host.uploader, host.notifier);

        let rewritten = rewrite_images(&text, &references, AltTextStyle::from(&self.config));
        let (text, links) = resolve_links(
            rewritten.text,
            host.links,
            &self.config.redirect_field,
            host.notifier,
        );

        let committed = self.config.replace_original_doc || action == Action::Replace;
        if committed {
            host.document.set_text(&text)?;
            info!("Updated source document");
        }

        match action {
            Action::Publish => {
                host.sink.write_text(&text)?;
                host.notifier
                    .notify(&format!("Copied to {}", host.sink.name()), NOTICE_INFO);
            }
            Action::Replace => {
                host.notifier.notify("Document updated", NOTICE_INFO);
            }
        }

        Ok(PublishReport {
            action,
            text,
            references: references.len(),
            uploads,
            images_rewritten: rewritten.replacements,
            links,
            committed,
        })
    }
}
