//! YAML frontmatter parsing for linked documents.

use serde_yaml::{Mapping, Value};
use tracing::warn;
use vaultpub_core::Frontmatter;

/// Parse the leading `---` block of a markdown document.
///
/// Scalar values are flattened to strings; sequences and mappings are
/// dropped. Returns `None` if there is no block, or it is not a YAML mapping.
pub(crate) fn parse_frontmatter(content: &str) -> Option<Frontmatter> {
    let raw = frontmatter_block(content)?;
    if raw.trim().is_empty() {
        return None;
    }

    let mapping: Mapping = match serde_yaml::from_str(&raw) {
        Ok(mapping) => mapping,
        Err(e) => {
            warn!("Invalid frontmatter: {e}");
            return None;
        }
    };

    Some(
        mapping
            .into_iter()
            .filter_map(|(key, value)| Some((scalar(key)?, scalar(value)?)))
            .collect(),
    )
}

/// Raw YAML between the opening `---` and the closing `---` or `...`.
fn frontmatter_block(content: &str) -> Option<String> {
    let mut lines = content.lines();
    if lines.next()?.trim_end() != "---" {
        return None;
    }

    let mut yaml_lines = Vec::new();
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some(yaml_lines.join("\n"));
        }
        yaml_lines.push(line);
    }
    None
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
