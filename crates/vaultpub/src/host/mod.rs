//! Terminal and filesystem implementations of the publisher's host traits.

mod document;
mod frontmatter;
mod links;
mod notifier;
mod sink;

pub(crate) use document::FileDocument;
pub(crate) use links::VaultLinkIndex;
pub(crate) use notifier::TerminalNotifier;
pub(crate) use sink::{FileSink, StdoutSink};
