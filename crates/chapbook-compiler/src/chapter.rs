//! Per-document compilation boundary.
//!
//! [`compile_chapter`] takes a chapter source plus what the caller knows
//! about the file on disk and produces metadata and sections ready for
//! emission. It is the only fallible step of the pipeline: everything past
//! front-matter validation is lossy-but-infallible.

use std::path::{Path, PathBuf};

use serde::Serialize;

use chapbook_blocks::extract_blocks;

use crate::compile::compile;
use crate::front_matter::{FrontMatter, FrontMatterError, split_front_matter};
use crate::node::Section;

/// What the caller knows about the source file. Timestamps are epoch
/// seconds and fall back to front-matter values (then zero) when the
/// filesystem does not provide them.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileInfo {
    pub created: Option<u64>,
    pub modified: Option<u64>,
    pub size: u64,
}

/// Chapter metadata as embedded in the emitted component module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChapterMeta {
    pub title: String,
    pub description: String,
    /// Chapter number: numeric identity, output file name, sort key.
    pub order: i64,
    /// Source path, kept for diagnostics and the reverse direction.
    pub path: PathBuf,
    /// Epoch seconds.
    pub created: u64,
    /// Epoch seconds.
    pub modified: u64,
    /// Source size in bytes.
    pub size: u64,
    pub keywords: Vec<String>,
}

/// A fully compiled chapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledChapter {
    pub meta: ChapterMeta,
    pub sections: Vec<Section>,
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("missing front-matter field `{field}` in {path}")]
    MissingFrontMatter { field: &'static str, path: PathBuf },

    #[error("invalid front matter in {path}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },
}

/// Compile one chapter document.
///
/// # Errors
///
/// Fails when the front matter is malformed YAML or lacks a required field
/// (`title`, `order`). Body problems never fail: unsupported Markdown is
/// dropped and unterminated custom tags pass through as text.
pub fn compile_chapter(
    source: &str,
    path: &Path,
    info: &FileInfo,
) -> Result<CompiledChapter, CompileError> {
    let (yaml, body) = split_front_matter(source);
    let front = match yaml {
        Some(yaml) => FrontMatter::from_yaml(yaml).map_err(|source| CompileError::FrontMatter {
            path: path.to_owned(),
            source,
        })?,
        None => FrontMatter::default(),
    };

    let missing = |field| CompileError::MissingFrontMatter {
        field,
        path: path.to_owned(),
    };
    let title = front.title.ok_or_else(|| missing("title"))?;
    let order = front.order.ok_or_else(|| missing("order"))?;
    let description = front.description.unwrap_or_default();

    let meta = ChapterMeta {
        title,
        description,
        order,
        path: path.to_owned(),
        created: front.created.or(info.created).unwrap_or(0),
        modified: front.modified.or(info.modified).unwrap_or(0),
        size: info.size,
        keywords: front.keywords,
    };

    let extraction = extract_blocks(body);
    let sections = compile(&extraction.text, &extraction);
    tracing::debug!(
        order = meta.order,
        sections = sections.len(),
        snippets = extraction.snippets.len(),
        flip_cards = extraction.flip_cards.len(),
        "compiled chapter"
    );

    Ok(CompiledChapter { meta, sections })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::node::{Inline, Node};

    use super::*;

    const FRONT: &str = "---\ntitle: Shaders\ndescription: Fragment shaders from scratch.\norder: 3\nkeywords:\n  - webgl\n---\n";

    fn info() -> FileInfo {
        FileInfo {
            created: Some(1_700_000_000),
            modified: Some(1_700_500_000),
            size: 2048,
        }
    }

    #[test]
    fn test_full_chapter() {
        let source = format!("{FRONT}# Shaders\n\n## Intro\n\nHello.\n");
        let chapter = compile_chapter(&source, Path::new("03-shaders.md"), &info()).unwrap();

        assert_eq!(chapter.meta.title, "Shaders");
        assert_eq!(chapter.meta.description, "Fragment shaders from scratch.");
        assert_eq!(chapter.meta.order, 3);
        assert_eq!(chapter.meta.created, 1_700_000_000);
        assert_eq!(chapter.meta.modified, 1_700_500_000);
        assert_eq!(chapter.meta.size, 2048);
        assert_eq!(chapter.meta.keywords, vec!["webgl".to_owned()]);

        assert_eq!(chapter.sections.len(), 1);
        assert_eq!(
            chapter.sections[0].nodes,
            vec![
                Node::Heading {
                    level: 2,
                    inlines: vec![Inline::Text("Intro".to_owned())],
                },
                Node::Paragraph(vec![Inline::Text("Hello.".to_owned())]),
            ]
        );
    }

    #[test]
    fn test_front_matter_timestamps_override_file_info() {
        let source =
            "---\ntitle: T\ndescription: D\norder: 1\ncreated: 100\nmodified: 200\n---\nBody.\n";
        let chapter = compile_chapter(source, Path::new("a.md"), &info()).unwrap();
        assert_eq!(chapter.meta.created, 100);
        assert_eq!(chapter.meta.modified, 200);
    }

    #[test]
    fn test_timestamps_default_to_zero() {
        let source = "---\ntitle: T\ndescription: D\norder: 1\n---\nBody.\n";
        let chapter = compile_chapter(source, Path::new("a.md"), &FileInfo::default()).unwrap();
        assert_eq!(chapter.meta.created, 0);
        assert_eq!(chapter.meta.modified, 0);
    }

    #[test]
    fn test_missing_title() {
        let source = "---\ndescription: D\norder: 1\n---\nBody.\n";
        let err = compile_chapter(source, Path::new("a.md"), &FileInfo::default()).unwrap_err();
        assert!(
            matches!(err, CompileError::MissingFrontMatter { field: "title", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_missing_description_defaults_empty() {
        let source = "---\ntitle: T\norder: 4\n---\nBody.\n";
        let chapter = compile_chapter(source, Path::new("a.md"), &FileInfo::default()).unwrap();
        assert_eq!(chapter.meta.description, "");
    }

    #[test]
    fn test_missing_order() {
        let source = "---\ntitle: T\ndescription: D\n---\nBody.\n";
        let err = compile_chapter(source, Path::new("a.md"), &FileInfo::default()).unwrap_err();
        assert!(
            matches!(err, CompileError::MissingFrontMatter { field: "order", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_no_front_matter_at_all() {
        let err = compile_chapter("Just text.\n", Path::new("a.md"), &FileInfo::default())
            .unwrap_err();
        assert!(matches!(err, CompileError::MissingFrontMatter { .. }));
    }

    #[test]
    fn test_malformed_yaml() {
        let source = "---\ntitle: [unclosed\n---\nBody.\n";
        let err = compile_chapter(source, Path::new("a.md"), &FileInfo::default()).unwrap_err();
        assert!(matches!(err, CompileError::FrontMatter { .. }));
    }

    #[test]
    fn test_empty_body_compiles_to_no_sections() {
        let source = "---\ntitle: T\ndescription: D\norder: 9\n---\n";
        let chapter = compile_chapter(source, Path::new("a.md"), &FileInfo::default()).unwrap();
        assert!(chapter.sections.is_empty());
    }
}
