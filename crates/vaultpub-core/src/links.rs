//! Internal link resolution pass.
//!
//! Each link recorded in the document's metadata is replaced, literally, by
//! either an external markdown link built from the target's redirect field
//! or, when that is not possible, by its plain display text.

use tracing::{debug, warn};

use crate::error::LinkError;
use crate::host::{DocumentLink, LinkIndex, NOTICE_ERROR, Notifier};

/// Counts from one link pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkSummary {
    /// Links rewritten to external URLs.
    pub resolved: usize,
    /// Links reduced to plain text.
    pub stripped: usize,
}

/// Rewrite every internal link in `text`.
pub(crate) fn resolve_links(
    mut text: String,
    index: &dyn LinkIndex,
    redirect_field: &str,
    notifier: &dyn Notifier,
) -> (String, LinkSummary) {
    let mut summary = LinkSummary::default();

    for link in index.links() {
        let replacement = match redirect_url(&link, index, redirect_field) {
            Ok(url) => {
                summary.resolved += 1;
                format!("[{}]({url})", link.display_text)
            }
            Err(error) => {
                summary.stripped += 1;
                warn!("{error}");
                notifier.notify(
                    &format!("{error}, link replaced with plain text"),
                    NOTICE_ERROR,
                );
                link.display_text.clone()
            }
        };
        debug!(markup = %link.original_markup, %replacement, "Replacing document link");
        text = replace_outside_embeds(&text, &link.original_markup, &replacement);
    }

    (text, summary)
}

/// Replace every occurrence of `markup` not directly preceded by `!`.
///
/// `![[Target]]` is a note embed, not a link, and is left as written.
fn replace_outside_embeds(text: &str, markup: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in text.match_indices(markup) {
        if text[..start].ends_with('!') {
            continue;
        }
        result.push_str(&text[last..start]);
        result.push_str(replacement);
        last = start + markup.len();
    }
    result.push_str(&text[last..]);
    result
}

fn redirect_url(
    link: &DocumentLink,
    index: &dyn LinkIndex,
    redirect_field: &str,
) -> Result<String, LinkError> {
    let document = index
        .resolve(&link.target)
        .ok_or_else(|| LinkError::Unresolvable {
            target: link.target.clone(),
        })?;
    let frontmatter =
        index
            .frontmatter(&document)
            .ok_or_else(|| LinkError::MissingFrontmatter {
                target: link.target.clone(),
            })?;
    frontmatter
        .get(redirect_field)
        .cloned()
        .ok_or_else(|| LinkError::MissingRedirectField {
            target: link.target.clone(),
            field: redirect_field.to_owned(),
        })
}
