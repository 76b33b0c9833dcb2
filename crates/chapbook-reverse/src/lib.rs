//! Best-effort Markdown recovery from generated component modules.
//!
//! The forward pipeline is lossy, so this direction is too: [`recover`]
//! never fails, it just returns whatever it could scrape. The result is a
//! migration draft for a human to review, not a faithful inverse.

use std::sync::LazyLock;

use regex::Regex;

use chapbook_compiler::FrontMatter;

pub mod rewrite;

pub use rewrite::body_to_markdown;

/// Longest description carried back into front matter.
const DESCRIPTION_LIMIT: usize = 160;

static TEMPLATE_BODY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)return `(.*)`;\s*\n\}").expect("template body pattern"));

static META_ORDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*order:\s*(-?\d+),?\s*$").expect("meta order pattern"));

static META_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*keywords:\s*(\[[^\n]*\]),?\s*$").expect("meta keywords pattern")
});

/// What could be scraped back out of a component module.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecoveredChapter {
    pub title: String,
    pub description: String,
    pub order: Option<i64>,
    pub keywords: Vec<String>,
    /// Body Markdown, without front matter.
    pub markdown: String,
}

impl RecoveredChapter {
    /// Serialize as a chapter document: reconstructed YAML front matter
    /// followed by the recovered body.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let front = FrontMatter {
            title: (!self.title.is_empty()).then(|| self.title.clone()),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
            order: self.order,
            keywords: self.keywords.clone(),
            created: None,
            modified: None,
        };
        let yaml = serde_yaml::to_string(&front).unwrap_or_default();
        format!("---\n{yaml}---\n\n{}", self.markdown)
    }
}

/// Recover a chapter from component-module source.
///
/// `order` and `keywords` come from the `meta` object literal; title and
/// description come from the recovered body (first `#` heading, first plain
/// paragraph truncated to 160 characters).
#[must_use]
pub fn recover(source: &str) -> RecoveredChapter {
    let body = TEMPLATE_BODY
        .captures(source)
        .and_then(|cap| cap.get(1))
        .map_or("", |m| m.as_str());
    if body.is_empty() {
        tracing::warn!("no template literal found, recovering from nothing");
    }
    let markdown = body_to_markdown(body);

    let order = META_ORDER
        .captures(source)
        .and_then(|cap| cap[1].parse().ok());
    let keywords = META_KEYWORDS
        .captures(source)
        .and_then(|cap| serde_json::from_str::<Vec<String>>(&cap[1]).ok())
        .unwrap_or_default();

    let (title, description) = scrape_title_and_description(&markdown);

    RecoveredChapter {
        title,
        description,
        order,
        keywords,
        markdown,
    }
}

/// First `# ` heading and first plain prose line of the recovered body.
fn scrape_title_and_description(markdown: &str) -> (String, String) {
    let mut title = String::new();
    let mut description = String::new();
    let mut in_fence = false;
    let mut in_tag = false;

    for line in markdown.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if trimmed.starts_with('<') {
            // Custom tag blocks are not prose.
            in_tag = !trimmed.starts_with("</");
            continue;
        }
        if in_tag || trimmed.is_empty() {
            continue;
        }
        if let Some(heading) = trimmed.strip_prefix("# ") {
            if title.is_empty() {
                title = heading.to_owned();
            }
            continue;
        }
        if trimmed.starts_with('#') || trimmed.starts_with("- ") || trimmed.starts_with("> ") {
            continue;
        }
        if description.is_empty() {
            description = truncate_chars(trimmed, DESCRIPTION_LIMIT);
        }
        if !title.is_empty() && !description.is_empty() {
            break;
        }
    }

    (title, description)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use chapbook_compiler::{FileInfo, compile_chapter};
    use chapbook_emit::{NavLinks, emit_component};

    use super::*;

    fn component(body: &str) -> String {
        let source = format!(
            "---\ntitle: Shaders\ndescription: Shader basics.\norder: 3\nkeywords:\n  - webgl\n  - glsl\n---\n{body}"
        );
        let chapter =
            compile_chapter(&source, Path::new("03-shaders.md"), &FileInfo::default()).unwrap();
        emit_component(&chapter, &NavLinks::default())
    }

    #[test]
    fn test_meta_scraped_from_module() {
        let recovered = recover(&component("## Intro\n\nShaders draw pixels.\n"));
        assert_eq!(recovered.order, Some(3));
        assert_eq!(recovered.keywords, vec!["webgl".to_owned(), "glsl".to_owned()]);
    }

    #[test]
    fn test_title_and_description_from_body() {
        let recovered = recover(&component("## Intro\n\nShaders draw pixels.\n"));
        assert_eq!(recovered.title, "Shaders");
        assert_eq!(recovered.description, "Shaders draw pixels.");
    }

    #[test]
    fn test_round_trip_structure() {
        let body = "## Intro\n\nHello **world**.\n\n```js\nlet x = 1;\n```\n";
        let recovered = recover(&component(body));
        assert_eq!(
            recovered.markdown,
            "# Shaders\n\n## Intro\n\nHello **world**.\n\n```js\nlet x = 1;\n```\n"
        );
    }

    #[test]
    fn test_recovered_document_recompiles() {
        // The draft a migration produces must itself be a valid chapter.
        let body = "## Intro\n\nShaders draw pixels.\n";
        let recovered = recover(&component(body));
        let document = recovered.to_markdown();

        let again = compile_chapter(&document, Path::new("draft.md"), &FileInfo::default())
            .expect("recovered draft compiles");
        assert_eq!(again.meta.title, "Shaders");
        assert_eq!(again.meta.order, 3);
        assert_eq!(again.sections.len(), 1);
    }

    #[test]
    fn test_description_truncated() {
        let long = "word ".repeat(60);
        let recovered = recover(&component(&format!("{long}\n")));
        assert_eq!(recovered.description.chars().count(), 160);
    }

    #[test]
    fn test_garbage_input_recovers_empty() {
        let recovered = recover("not a module at all");
        assert_eq!(recovered, RecoveredChapter::default());
    }

    #[test]
    fn test_flip_card_survives_round_trip() {
        let body = concat!(
            "## Demo\n\n",
            "<FlipCard width={500} height={300}>\n",
            "<DemoInit>(canvas, context) => { draw(); }</DemoInit>\n",
            "<CodeBlock title=\"Draw\" language=\"js\">draw()</CodeBlock>\n",
            "</FlipCard>\n",
        );
        let recovered = recover(&component(body));
        assert!(recovered.markdown.contains("<FlipCard width={500} height={300}>"));
        assert!(recovered.markdown.contains("draw();"));
        assert!(recovered.markdown.contains("<CodeBlock title=\"Draw\" language=\"js\">"));
    }
}
