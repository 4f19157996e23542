//! Link metadata for documents in a vault directory.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};
use tracing::{debug, warn};
use vaultpub_core::{DocumentLink, Frontmatter, LinkIndex, LinkedDocument};
use vaultpub_storage::{Storage, StorageError};

use super::frontmatter::parse_frontmatter;

/// [`LinkIndex`] over the markdown files of a vault.
///
/// Collects `[[target|alias]]` wiki links and inline links to local `.md`
/// files from the document, and resolves their targets against the vault:
/// first as a path relative to the document (or the vault root), then by a
/// unique file name match anywhere in the vault.
pub(crate) struct VaultLinkIndex<'a> {
    storage: &'a dyn Storage,
    links: Vec<DocumentLink>,
    documents: Vec<PathBuf>,
    source_dir: PathBuf,
}

impl<'a> VaultLinkIndex<'a> {
    /// Index the links of `text`, a document stored in `source_dir`.
    pub(crate) fn new(
        storage: &'a dyn Storage,
        text: &str,
        source_dir: &Path,
    ) -> Result<Self, StorageError> {
        let documents = storage.scan_markdown()?;
        let links = collect_links(text);
        debug!(
            links = links.len(),
            documents = documents.len(),
            "Indexed document links"
        );
        Ok(Self {
            storage,
            links,
            documents,
            source_dir: source_dir.to_path_buf(),
        })
    }

    fn find_by_path(&self, relative: &Path) -> Option<&PathBuf> {
        [self.source_dir.join(relative), relative.to_path_buf()]
            .into_iter()
            .map(|candidate| normalize(&candidate))
            .find_map(|candidate| self.documents.iter().find(|doc| **doc == candidate))
    }

    fn find_by_name(&self, relative: &Path) -> Option<&PathBuf> {
        let name = relative.file_name()?;
        let mut matches = self
            .documents
            .iter()
            .filter(|doc| doc.file_name() == Some(name));
        let first = matches.next()?;
        if matches.next().is_some() {
            warn!(target = %relative.display(), "Ambiguous link target");
            return None;
        }
        Some(first)
    }
}

impl LinkIndex for VaultLinkIndex<'_> {
    fn links(&self) -> Vec<DocumentLink> {
        self.links.clone()
    }

    fn resolve(&self, target: &str) -> Option<LinkedDocument> {
        let target = target.split('#').next().unwrap_or_default().trim();
        if target.is_empty() {
            return None;
        }
        let relative = if target.ends_with(".md") {
            PathBuf::from(target)
        } else {
            PathBuf::from(format!("{target}.md"))
        };

        self.find_by_path(&relative)
            .or_else(|| self.find_by_name(&relative))
            .map(|path| LinkedDocument { path: path.clone() })
    }

    fn frontmatter(&self, document: &LinkedDocument) -> Option<Frontmatter> {
        match self.storage.read_to_string(&document.path) {
            Ok(content) => parse_frontmatter(&content),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }
}

/// Internal links in document order, one entry per distinct markup.
fn collect_links(text: &str) -> Vec<DocumentLink> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_WIKILINKS);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut current: Option<(String, String)> = None;
    let mut display = String::new();

    for (event, range) in Parser::new_ext(text, options).into_offset_iter() {
        match event {
            Event::Start(Tag::Link {
                link_type, dest_url, ..
            }) => {
                let target = match link_type {
                    LinkType::WikiLink { .. } => Some(dest_url.to_string()),
                    LinkType::Inline if is_local_markdown(&dest_url) => {
                        Some(percent_decode_str(&dest_url).decode_utf8_lossy().into_owned())
                    }
                    _ => None,
                };
                current = target.map(|t| (text[range].to_owned(), t));
                display.clear();
            }
            Event::Text(t) | Event::Code(t) if current.is_some() => display.push_str(&t),
            Event::End(TagEnd::Link) => {
                if let Some((markup, target)) = current.take()
                    && seen.insert(markup.clone())
                {
                    links.push(DocumentLink {
                        original_markup: markup,
                        display_text: display.clone(),
                        target,
                    });
                }
            }
            _ => {}
        }
    }

    links
}

fn is_local_markdown(dest: &str) -> bool {
    let path = dest.split('#').next().unwrap_or_default();
    !dest.contains("://") && !dest.starts_with("mailto:") && path.ends_with(".md")
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vaultpub_storage::FsStorage;

    use super::*;

    fn link(markup: &str, display: &str, target: &str) -> DocumentLink {
        DocumentLink {
            original_markup: markup.to_owned(),
            display_text: display.to_owned(),
            target: target.to_owned(),
        }
    }

    fn vault(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, content).unwrap();
        }
        dir
    }

    #[test]
    fn test_collect_wiki_links() {
        let links = collect_links("See [[Target]] and [[Other|the other one]].");

        assert_eq!(
            links,
            vec![
                link("[[Target]]", "Target", "Target"),
                link("[[Other|the other one]]", "the other one", "Other"),
            ]
        );
    }

    #[test]
    fn test_collect_inline_markdown_links() {
        let text = "[Read this](notes/My%20Post.md) and [site](https://example.com/a.md)";
        let links = collect_links(text);

        assert_eq!(
            links,
            vec![link(
                "[Read this](notes/My%20Post.md)",
                "Read this",
                "notes/My Post.md"
            )]
        );
    }

    #[test]
    fn test_collect_skips_images_code_and_frontmatter() {
        let text = "---\nsee: \"[[Hidden]]\"\n---\n![[pic.png]]\n\n`[[Code]]`\n\n```\n[[Fenced]]\n```\n";

        assert!(collect_links(text).is_empty());
    }

    #[test]
    fn test_collect_deduplicates_markup() {
        let links = collect_links("[[A]] then [[A]] then [[A|alias]]");

        assert_eq!(
            links,
            vec![link("[[A]]", "A", "A"), link("[[A|alias]]", "alias", "A")]
        );
    }

    #[test]
    fn test_is_local_markdown() {
        assert!(is_local_markdown("post.md"));
        assert!(is_local_markdown("../post.md#intro"));
        assert!(!is_local_markdown("https://example.com/post.md"));
        assert!(!is_local_markdown("post.html"));
        assert!(!is_local_markdown("mailto:me@example.md"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("a/./b/../c.md")), PathBuf::from("a/c.md"));
        assert_eq!(normalize(Path::new("../x.md")), PathBuf::from("x.md"));
    }

    #[test]
    fn test_resolve_relative_then_name() {
        let dir = vault(&[
            ("notes/Post.md", ""),
            ("notes/sub/Deep.md", ""),
            ("Top.md", ""),
        ]);
        let storage = FsStorage::new(dir.path().to_path_buf());
        let index = VaultLinkIndex::new(&storage, "", Path::new("notes")).unwrap();

        let resolved = |t: &str| index.resolve(t).map(|d| d.path);
        assert_eq!(resolved("Post"), Some(PathBuf::from("notes/Post.md")));
        assert_eq!(resolved("sub/Deep.md"), Some(PathBuf::from("notes/sub/Deep.md")));
        assert_eq!(resolved("../Top"), Some(PathBuf::from("Top.md")));
        assert_eq!(resolved("Top"), Some(PathBuf::from("Top.md")));
        assert_eq!(resolved("Deep#Heading"), Some(PathBuf::from("notes/sub/Deep.md")));
        assert_eq!(resolved("Missing"), None);
        assert_eq!(resolved(""), None);
    }

    #[test]
    fn test_resolve_ambiguous_name() {
        let dir = vault(&[("a/Same.md", ""), ("b/Same.md", "")]);
        let storage = FsStorage::new(dir.path().to_path_buf());
        let index = VaultLinkIndex::new(&storage, "", Path::new("")).unwrap();

        assert!(index.resolve("Same").is_none());
        assert_eq!(
            index.resolve("a/Same").map(|d| d.path),
            Some(PathBuf::from("a/Same.md"))
        );
    }

    #[test]
    fn test_frontmatter_of_linked_document() {
        let dir = vault(&[
            ("Post.md", "---\nurl: https://blog.example/post\n---\n# Post\n"),
            ("Plain.md", "# Plain\n"),
        ]);
        let storage = FsStorage::new(dir.path().to_path_buf());
        let index = VaultLinkIndex::new(&storage, "", Path::new("")).unwrap();

        let post = index.resolve("Post").unwrap();
        assert_eq!(
            index
                .frontmatter(&post)
                .and_then(|fm| fm.get("url").cloned()),
            Some("https://blog.example/post".to_owned())
        );
        let plain = index.resolve("Plain").unwrap();
        assert!(index.frontmatter(&plain).is_none());
    }
}
