//! Image upload and link rewriting for markdown vault documents.
//!
//! The [`Publisher`] takes a document from its host, uploads every local
//! image it references and rewrites the text so that:
//!
//! - `![[pic.png]]` and `![alt](pic.png)` point at the uploaded URL
//! - internal links point at the URL stored in the linked document's
//!   frontmatter, or are reduced to plain text
//!
//! The result is written to an [`OutputSink`] (`PUBLISH`) or back to the
//! document (`REPLACE`).
//!
//! # Architecture
//!
//! - [`ReferenceExtractor`] finds image references with two regex rules
//! - uploads fan out on the rayon pool through an [`Uploader`]
//! - each [`ImageReference`] carries a write-once [`UploadOutcome`]
//! - host access goes through the traits in this crate and
//!   [`vaultpub_storage::Storage`]
//!
//! # Example
//!
//! ```ignore
//! use vaultpub_core::{Collaborators, Publisher};
//!
//! let publisher = Publisher::new(config.publish.clone(), Collaborators {
//!     document: &document,
//!     storage: &storage,
//!     uploader: &uploader,
//!     links: &links,
//!     notifier: &notifier,
//!     sink: &sink,
//! });
//! let report = publisher.process("PUBLISH")?;
//! ```

mod error;
mod host;
mod links;
mod publisher;
mod reference;
mod rewrite;
#[cfg(test)]
mod test_support;
mod upload;

pub use error::{AssetError, HostError, LinkError, ProcessError, UploadError};
pub use host::{
    DocumentLink, DocumentSource, Frontmatter, LinkIndex, LinkedDocument, NOTICE_ERROR,
    NOTICE_INFO, Notifier, OutputSink,
};
pub use links::LinkSummary;
pub use publisher::{Action, Collaborators, PublishReport, Publisher};
pub use reference::{ImageReference, ReferenceExtractor, UploadOutcome};
pub use rewrite::AltTextStyle;
pub use upload::{UploadSummary, Uploader};
