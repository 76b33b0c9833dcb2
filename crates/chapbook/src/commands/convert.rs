//! `chapbook convert` command implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use clap::Args;

use chapbook_compiler::{CompiledChapter, FileInfo, compile_chapter};
use chapbook_emit::{NavLink, NavLinks, emit_component};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Directory containing chapter Markdown sources.
    #[arg(short, long, default_value = "content")]
    pub(crate) content_dir: PathBuf,

    /// Directory receiving the generated modules.
    #[arg(short, long, default_value = "src/chapters")]
    pub(crate) output_dir: PathBuf,

    /// Enable verbose output (per-document compilation logs).
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// Each document either fully succeeds or is skipped; one bad chapter
    /// never blocks the rest of the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory is unreadable or if any
    /// document failed, after the whole batch has been attempted.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let sources = collect_chapter_sources(&self.content_dir)?;
        if sources.is_empty() {
            output.warning(&format!(
                "No chapters found in {}",
                self.content_dir.display()
            ));
            return Ok(());
        }

        let mut compiled: Vec<CompiledChapter> = Vec::new();
        let mut skipped = 0usize;
        for path in sources {
            let source = match fs::read_to_string(&path) {
                Ok(source) => source,
                Err(err) => {
                    output.warning(&format!("Skipping {}: {err}", path.display()));
                    skipped += 1;
                    continue;
                }
            };
            match compile_chapter(&source, &path, &file_info(&path)) {
                Ok(chapter) => {
                    tracing::info!(
                        path = %path.display(),
                        order = chapter.meta.order,
                        "compiled chapter"
                    );
                    if chapter.sections.is_empty() {
                        output.warning(&format!(
                            "{}: compiled to empty content",
                            path.display()
                        ));
                    }
                    compiled.push(chapter);
                }
                Err(err) => {
                    output.warning(&format!("Skipping {}: {err}", path.display()));
                    skipped += 1;
                }
            }
        }

        compiled.sort_by_key(|chapter| chapter.meta.order);
        for pair in compiled.windows(2) {
            if pair[0].meta.order == pair[1].meta.order {
                output.warning(&format!(
                    "Duplicate order {}: {} and {}",
                    pair[0].meta.order,
                    pair[0].meta.path.display(),
                    pair[1].meta.path.display()
                ));
            }
        }

        fs::create_dir_all(&self.output_dir)?;
        let mut converted = 0usize;
        for (index, chapter) in compiled.iter().enumerate() {
            let nav = NavLinks {
                prev: index
                    .checked_sub(1)
                    .and_then(|i| compiled.get(i))
                    .map(nav_link),
                next: compiled.get(index + 1).map(nav_link),
            };
            let module = emit_component(chapter, &nav);
            let dest = self
                .output_dir
                .join(format!("chapter-{}.js", chapter.meta.order));
            match write_atomic(&dest, &module) {
                Ok(()) => {
                    output.success(&format!(
                        "Converted {} -> {}",
                        chapter.meta.path.display(),
                        dest.display()
                    ));
                    converted += 1;
                }
                Err(err) => {
                    output.error(&format!("Failed to write {}: {err}", dest.display()));
                    skipped += 1;
                }
            }
        }

        output.info(&format!("{converted} converted, {skipped} skipped"));
        if skipped > 0 {
            return Err(CliError::Validation(format!(
                "{skipped} chapter(s) failed"
            )));
        }
        Ok(())
    }
}

/// Markdown files directly under the content directory, hidden files
/// skipped, sorted by name for stable processing order.
fn collect_chapter_sources(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        sources.push(path);
    }
    sources.sort();
    Ok(sources)
}

/// Filesystem facts about a source, absent pieces left for front matter.
fn file_info(path: &Path) -> FileInfo {
    let Ok(meta) = fs::metadata(path) else {
        return FileInfo::default();
    };
    let epoch_secs = |time: std::io::Result<std::time::SystemTime>| {
        time.ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
    };
    FileInfo {
        created: epoch_secs(meta.created()),
        modified: epoch_secs(meta.modified()),
        size: meta.len(),
    }
}

/// Write via a sibling temp file and rename, so readers never observe a
/// half-written module.
fn write_atomic(dest: &Path, content: &str) -> std::io::Result<()> {
    let tmp = dest.with_extension("js.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, dest)
}

fn nav_link(chapter: &CompiledChapter) -> NavLink {
    NavLink {
        order: chapter.meta.order,
        title: chapter.meta.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn write_chapter(dir: &Path, name: &str, title: &str, order: i64, body: &str) {
        let source = format!(
            "---\ntitle: {title}\ndescription: About {title}.\norder: {order}\n---\n{body}"
        );
        fs::write(dir.join(name), source).unwrap();
    }

    fn args(content: &Path, out: &Path) -> ConvertArgs {
        ConvertArgs {
            content_dir: content.to_owned(),
            output_dir: out.to_owned(),
            verbose: false,
        }
    }

    #[test]
    fn test_convert_batch() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        let out = dir.path().join("chapters");
        fs::create_dir(&content).unwrap();
        write_chapter(&content, "01-intro.md", "Intro", 1, "# Intro\n\nHello.\n");
        write_chapter(&content, "02-more.md", "More", 2, "## Deep\n\nBye.\n");

        args(&content, &out).execute(&Output::new()).unwrap();

        let first = fs::read_to_string(out.join("chapter-1.js")).unwrap();
        let second = fs::read_to_string(out.join("chapter-2.js")).unwrap();
        assert!(first.contains("title: \"Intro\""));
        assert!(second.contains("order: 2,"));
        // Navigation links point at the neighbors.
        assert!(first.contains("href=\"chapter-2\">More &raquo;"));
        assert!(second.contains("href=\"chapter-1\">&laquo; Intro"));
        assert!(!out.join("chapter-1.js.tmp").exists());
    }

    #[test]
    fn test_bad_chapter_skipped_batch_continues() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        let out = dir.path().join("chapters");
        fs::create_dir(&content).unwrap();
        write_chapter(&content, "01-good.md", "Good", 1, "Hello.\n");
        fs::write(content.join("02-bad.md"), "no front matter here\n").unwrap();

        let err = args(&content, &out).execute(&Output::new()).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
        assert!(out.join("chapter-1.js").exists());
    }

    #[test]
    fn test_hidden_and_non_markdown_ignored() {
        let dir = tempdir().unwrap();
        let content = dir.path().join("content");
        fs::create_dir(&content).unwrap();
        fs::write(content.join(".draft.md"), "hidden").unwrap();
        fs::write(content.join("notes.txt"), "not markdown").unwrap();

        let sources = collect_chapter_sources(&content).unwrap();
        assert_eq!(sources, Vec::<PathBuf>::new());
    }

    #[test]
    fn test_empty_content_dir_is_ok() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("chapters");
        args(dir.path(), &out).execute(&Output::new()).unwrap();
        assert!(!out.exists());
    }
}
