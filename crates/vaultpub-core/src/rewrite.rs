//! Image substitution pass.
//!
//! Literal replace-all of each uploaded reference's original span. No
//! pattern matching happens here, so a rewritten `![alt](https://...)` can
//! never be picked up again within the same pass.

use tracing::debug;
use vaultpub_config::PublishConfig;

use crate::reference::ImageReference;

/// How alt text is rendered in rewritten image markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltTextStyle {
    /// Emit the display name; otherwise the alt text is empty.
    pub include: bool,
    /// Turn `-` and `_` into spaces.
    pub replace_separators: bool,
}

impl From<&PublishConfig> for AltTextStyle {
    fn from(config: &PublishConfig) -> Self {
        Self {
            include: config.image_alt_text,
            replace_separators: config.replace_alt_separators,
        }
    }
}

impl AltTextStyle {
    fn render(self, display_name: &str) -> String {
        if !self.include {
            String::new()
        } else if self.replace_separators {
            display_name.replace(['-', '_'], " ")
        } else {
            display_name.to_owned()
        }
    }
}

/// Output of a rewrite pass.
#[derive(Debug)]
pub(crate) struct Rewritten {
    pub text: String,
    /// Number of occurrences replaced.
    pub replacements: usize,
}

/// Replace every uploaded reference with remote image markup.
///
/// References without a successful upload are left untouched.
pub(crate) fn rewrite_images(
    text: &str,
    references: &[ImageReference],
    style: AltTextStyle,
) -> Rewritten {
    let mut text = text.to_owned();
    let mut replacements = 0;

    for reference in references {
        let Some(url) = reference.remote_url() else {
            continue;
        };
        let span = reference.original_span();
        let count = text.matches(span).count();
        if count == 0 {
            // Identical span already replaced by an earlier duplicate
            continue;
        }

        let markup = format!("![{}]({url})", style.render(reference.display_name()));
        debug!(%span, %markup, count, "Replacing image reference");
        text = text.replace(span, &markup);
        replacements += count;
    }

    Rewritten { text, replacements }
}
